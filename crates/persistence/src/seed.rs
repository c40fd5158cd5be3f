//! Permissions every installation starts with.
//!
//! The PostgreSQL migrations insert the same rows; the in-process store is
//! seeded from this list.

use domain::models::RawPermission;

pub const DEFAULT_PERMISSIONS: &[(&str, &str)] = &[
    ("admin.roles.view", "Ver roles"),
    ("admin.roles.create", "Crear roles"),
    ("admin.roles.edit", "Editar roles"),
    ("admin.roles.delete", "Eliminar roles"),
    ("admin.users.view", "Ver usuarios"),
    ("admin.users.create", "Crear usuarios"),
    ("admin.users.edit", "Editar usuarios"),
    ("admin.users.delete", "Eliminar usuarios"),
    ("admin.permissions.view", "Ver permisos"),
    ("admin.countries.view", "Ver países"),
    ("admin.countries.edit", "Editar países"),
    ("admin.departments.view", "Ver departamentos"),
    ("admin.departments.edit", "Editar departamentos"),
    ("admin.cities.view", "Ver ciudades"),
    ("admin.cities.edit", "Editar ciudades"),
    ("admin.establishments.view", "Ver establecimientos"),
    ("admin.commerces.view", "Ver comercios"),
    ("admin.commerces.review", "Validar comercios"),
    ("admin.dashboard.view", "Ver tablero"),
    ("provider.campaigns.view", "Ver campañas"),
    ("provider.campaigns.create", "Crear campañas"),
    ("provider.dashboard.view", "Ver tablero de proveedor"),
    ("provider.payouts.view", "Ver medios de pago"),
    ("app.support.create", "Crear solicitudes de soporte"),
];

pub fn default_permissions() -> Vec<RawPermission> {
    DEFAULT_PERMISSIONS
        .iter()
        .map(|(name, description)| RawPermission::new(*name, Some(*description)))
        .collect()
}
