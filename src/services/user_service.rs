// src/services/user_service.rs
use crate::{
    config::SeedAccount,
    error::AppResult,
    models::user::{NewUser, User},
    services::auth_service,
    store::AttendanceStore,
};

/// Creates the configured account, or only refreshes its required hours if it exists.
pub async fn ensure_seed_user(store: &dyn AttendanceStore, seed: &SeedAccount) -> AppResult<User> {
    if let Some(existing) = store.find_user_by_student_id(&seed.student_id).await? {
        store
            .set_total_hours_required(existing.id, seed.total_hours_required)
            .await?;
        tracing::info!(
            "Seed user '{}' updated to {} required hours.",
            seed.student_id,
            seed.total_hours_required
        );
        return Ok(User {
            total_hours_required: seed.total_hours_required,
            ..existing
        });
    }

    let password_hash = auth_service::hash_password(&seed.password).await?;
    let user = store
        .insert_user(NewUser {
            student_id: seed.student_id.clone(),
            name: seed.name.clone(),
            password_hash,
            total_hours_required: seed.total_hours_required,
        })
        .await?;
    tracing::info!("Seed user '{}' created.", seed.student_id);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_seed_is_created_once() {
        let store = MemoryStore::new();
        let mut seed = SeedAccount {
            student_id: "2001501".into(),
            name: "Trainee".into(),
            password: "admin123".into(),
            total_hours_required: dec!(300),
        };

        let created = ensure_seed_user(&store, &seed).await.unwrap();
        assert_eq!(created.total_hours_required, dec!(300));

        seed.total_hours_required = dec!(386);
        let updated = ensure_seed_user(&store, &seed).await.unwrap();
        assert_eq!(updated.id, created.id);

        let stored = store.find_user(created.id).await.unwrap().unwrap();
        assert_eq!(stored.total_hours_required, dec!(386));
        // Password hash is not regenerated on update
        assert_eq!(stored.password_hash, created.password_hash);
    }
}
