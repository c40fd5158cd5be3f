use axum::{middleware, routing::get, Router};
use domain::models::{
    City, Commerce, Country, Department, LegalRepresentative, Neighborhood, PayoutMethod,
    PriorityType, Resource, User,
};
use domain::services::{ResourceService, RoleService};
use persistence::{MemoryStore, PgRbacStore, PgResourceRepository};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{commerces, health, permissions, resources, roles, user_access};

/// Every service the HTTP layer dispatches to, bound to one storage backend.
#[derive(Clone)]
pub struct Services {
    pub roles: RoleService,
    pub commerces: ResourceService<Commerce>,
    pub users: ResourceService<User>,
    pub priority_types: ResourceService<PriorityType>,
    pub legal_representatives: ResourceService<LegalRepresentative>,
    pub payout_methods: ResourceService<PayoutMethod>,
    pub countries: ResourceService<Country>,
    pub departments: ResourceService<Department>,
    pub cities: ResourceService<City>,
    pub neighborhoods: ResourceService<Neighborhood>,
    /// Present on the PostgreSQL backend; used by health and pool metrics
    pub pool: Option<PgPool>,
}

impl Services {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            roles: RoleService::new(Arc::new(PgRbacStore::new(pool.clone()))),
            commerces: pg_resource(&pool),
            users: pg_resource(&pool),
            priority_types: pg_resource(&pool),
            legal_representatives: pg_resource(&pool),
            payout_methods: pg_resource(&pool),
            countries: pg_resource(&pool),
            departments: pg_resource(&pool),
            cities: pg_resource(&pool),
            neighborhoods: pg_resource(&pool),
            pool: Some(pool),
        }
    }

    /// All services share one in-process store.
    pub fn memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            roles: RoleService::new(store.clone()),
            commerces: ResourceService::new(store.clone()),
            users: ResourceService::new(store.clone()),
            priority_types: ResourceService::new(store.clone()),
            legal_representatives: ResourceService::new(store.clone()),
            payout_methods: ResourceService::new(store.clone()),
            countries: ResourceService::new(store.clone()),
            departments: ResourceService::new(store.clone()),
            cities: ResourceService::new(store.clone()),
            neighborhoods: ResourceService::new(store),
            pool: None,
        }
    }
}

fn pg_resource<R: Resource>(pool: &PgPool) -> ResourceService<R> {
    ResourceService::new(Arc::new(PgResourceRepository::<R>::new(pool.clone())))
}

/// State shared by the permission, role and health handlers. Resource
/// routers carry their own [`resources::ResourceState`].
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub roles: RoleService,
    pub pool: Option<PgPool>,
}

pub fn create_app(config: Config, services: Services) -> Router {
    let config = Arc::new(config);
    let pagination = config.pagination;

    let state = AppState {
        config: config.clone(),
        roles: services.roles,
        pool: services.pool,
    };

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let api_routes = Router::new()
        .nest("/permissions", permissions::router())
        .nest("/roles", roles::router())
        .nest(
            "/users",
            user_access::router().merge(resources::router(resources::ResourceState::new(
                services.users,
                pagination,
            ))),
        )
        .nest(
            "/commerces",
            commerces::router(resources::ResourceState::new(services.commerces, pagination)),
        )
        .nest(
            "/priority-types",
            resources::router(resources::ResourceState::new(
                services.priority_types,
                pagination,
            )),
        )
        .nest(
            "/legal-representatives",
            resources::router(resources::ResourceState::new(
                services.legal_representatives,
                pagination,
            )),
        )
        .nest(
            "/payout-methods",
            resources::router(resources::ResourceState::new(
                services.payout_methods,
                pagination,
            )),
        )
        .nest(
            "/countries",
            resources::router(resources::ResourceState::new(services.countries, pagination)),
        )
        .nest(
            "/departments",
            resources::router(resources::ResourceState::new(
                services.departments,
                pagination,
            )),
        )
        .nest(
            "/cities",
            resources::router(resources::ResourceState::new(services.cities, pagination)),
        )
        .nest(
            "/neighborhoods",
            resources::router(resources::ResourceState::new(
                services.neighborhoods,
                pagination,
            )),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .nest("/api/v1", api_routes)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
