//! Seed reference data: the default country and the built-in roles.

use handsoft_core::config::AppConfig;
use handsoft_core::error::AppError;
use handsoft_database::repositories::geo::GeoRepository;
use handsoft_database::repositories::role::RoleRepository;
use handsoft_entity::geo::DEFAULT_COUNTRY_CODE;

use crate::output;

/// Execute the seed command. Safe to run repeatedly.
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let geo = GeoRepository::new(pool.clone());
    let roles = RoleRepository::new(pool.clone());

    let country = geo.ensure_country("Chile", DEFAULT_COUNTRY_CODE).await?;
    let admin = roles.ensure(&config.auth.super_admin_role, true).await?;
    let default = roles.ensure(&config.auth.default_role, false).await?;

    output::print_fields(&[
        ("country", format!("{} ({})", country.name, country.code)),
        ("super-admin role", format!("{} (id {})", admin.name, admin.id)),
        ("default role", format!("{} (id {})", default.name, default.id)),
    ]);

    if admin.id == default.id {
        output::Notice::Warn.emit("auth.default_role equals auth.super_admin_role");
    }

    pool.close().await;
    output::Notice::Done.emit("Seed data in place.");
    Ok(())
}
