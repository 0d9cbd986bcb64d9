//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::domains::{self, DomainRouterState};
use crate::genai::GeminiClient;
use crate::jwt::JwtManager;
use crate::middleware::{
    require_auth_middleware, AuthMiddlewareState, ObservabilityLayer, SanitizedMakeSpan,
};
use crate::openapi::ApiDoc;
use crate::repository::{
    appointment::AppointmentRepositoryImpl,
    device::DeviceRepositoryImpl,
    driver::DriverRepositoryImpl,
    insight::InsightRepositoryImpl,
    profile::{BusinessProfileRepositoryImpl, PersonProfileRepositoryImpl},
    role::RoleRepositoryImpl,
    subscription::SubscriptionRepositoryImpl,
    telemetry::TelemetryRepositoryImpl,
    user::UserRepositoryImpl,
    vehicle::VehicleRepositoryImpl,
    workshop::WorkshopRepositoryImpl,
};
use crate::service::{
    DeviceService, DriverService, InsightService, ProfileService, RoleService,
    SubscriptionService, UserService, VehicleService, WorkshopService,
};
use crate::state::{
    HasDevices, HasFleet, HasIam, HasInsights, HasPayments, HasProfiles, HasServices,
    HasWorkshops,
};
use crate::stripe::StripeClient;
use anyhow::Result;
use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub jwt_manager: JwtManager,
    pub user_service: Arc<UserService<UserRepositoryImpl>>,
    pub role_service: Arc<RoleService<RoleRepositoryImpl>>,
    pub profile_service:
        Arc<ProfileService<PersonProfileRepositoryImpl, BusinessProfileRepositoryImpl>>,
    pub vehicle_service: Arc<VehicleService<VehicleRepositoryImpl>>,
    pub driver_service: Arc<DriverService<DriverRepositoryImpl, VehicleRepositoryImpl>>,
    pub device_service: Arc<DeviceService<DeviceRepositoryImpl, TelemetryRepositoryImpl>>,
    pub subscription_service: Arc<SubscriptionService<SubscriptionRepositoryImpl>>,
    pub insight_service: Arc<InsightService<InsightRepositoryImpl>>,
    pub workshop_service: Arc<WorkshopService<WorkshopRepositoryImpl, AppointmentRepositoryImpl>>,
}

impl HasServices for AppState {
    fn config(&self) -> &Config {
        &self.config
    }

    fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    async fn check_ready(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.db_pool).await.is_ok()
    }
}

impl HasIam for AppState {
    type UserRepo = UserRepositoryImpl;
    type RoleRepo = RoleRepositoryImpl;

    fn user_service(&self) -> &UserService<Self::UserRepo> {
        &self.user_service
    }

    fn role_service(&self) -> &RoleService<Self::RoleRepo> {
        &self.role_service
    }
}

impl HasProfiles for AppState {
    type PersonProfileRepo = PersonProfileRepositoryImpl;
    type BusinessProfileRepo = BusinessProfileRepositoryImpl;

    fn profile_service(
        &self,
    ) -> &ProfileService<Self::PersonProfileRepo, Self::BusinessProfileRepo> {
        &self.profile_service
    }
}

impl HasFleet for AppState {
    type VehicleRepo = VehicleRepositoryImpl;
    type DriverRepo = DriverRepositoryImpl;

    fn vehicle_service(&self) -> &VehicleService<Self::VehicleRepo> {
        &self.vehicle_service
    }

    fn driver_service(&self) -> &DriverService<Self::DriverRepo, Self::VehicleRepo> {
        &self.driver_service
    }
}

impl HasDevices for AppState {
    type DeviceRepo = DeviceRepositoryImpl;
    type TelemetryRepo = TelemetryRepositoryImpl;

    fn device_service(&self) -> &DeviceService<Self::DeviceRepo, Self::TelemetryRepo> {
        &self.device_service
    }
}

impl HasPayments for AppState {
    type SubscriptionRepo = SubscriptionRepositoryImpl;

    fn subscription_service(&self) -> &SubscriptionService<Self::SubscriptionRepo> {
        &self.subscription_service
    }
}

impl HasInsights for AppState {
    type InsightRepo = InsightRepositoryImpl;

    fn insight_service(&self) -> &InsightService<Self::InsightRepo> {
        &self.insight_service
    }
}

impl HasWorkshops for AppState {
    type WorkshopRepo = WorkshopRepositoryImpl;
    type AppointmentRepo = AppointmentRepositoryImpl;

    fn workshop_service(&self) -> &WorkshopService<Self::WorkshopRepo, Self::AppointmentRepo> {
        &self.workshop_service
    }
}

/// Connect to MySQL, wire every context and serve HTTP until the process exits
pub async fn run(config: Config, prometheus_handle: Option<PrometheusHandle>) -> Result<()> {
    let db_pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;
    info!("Connected to database");

    let user_repo = Arc::new(UserRepositoryImpl::new(db_pool.clone()));
    let role_repo = Arc::new(RoleRepositoryImpl::new(db_pool.clone()));
    let person_repo = Arc::new(PersonProfileRepositoryImpl::new(db_pool.clone()));
    let business_repo = Arc::new(BusinessProfileRepositoryImpl::new(db_pool.clone()));
    let vehicle_repo = Arc::new(VehicleRepositoryImpl::new(db_pool.clone()));
    let driver_repo = Arc::new(DriverRepositoryImpl::new(db_pool.clone()));
    let device_repo = Arc::new(DeviceRepositoryImpl::new(db_pool.clone()));
    let telemetry_repo = Arc::new(TelemetryRepositoryImpl::new(db_pool.clone()));
    let subscription_repo = Arc::new(SubscriptionRepositoryImpl::new(db_pool.clone()));
    let insight_repo = Arc::new(InsightRepositoryImpl::new(db_pool.clone()));
    let workshop_repo = Arc::new(WorkshopRepositoryImpl::new(db_pool.clone()));
    let appointment_repo = Arc::new(AppointmentRepositoryImpl::new(db_pool.clone()));

    let jwt_manager = JwtManager::new(config.jwt.clone());

    let role_service = Arc::new(RoleService::new(role_repo));
    role_service.seed().await?;
    info!("Roles seeded");

    // Services double as the facades other contexts call into
    let user_service = Arc::new(UserService::new(user_repo, jwt_manager.clone()));
    let profile_service = Arc::new(ProfileService::new(
        person_repo,
        business_repo,
        user_service.clone(),
    ));
    let vehicle_service = Arc::new(VehicleService::new(
        vehicle_repo.clone(),
        user_service.clone(),
    ));
    let driver_service = Arc::new(DriverService::new(
        driver_repo,
        vehicle_repo,
        user_service.clone(),
    ));
    let device_service = Arc::new(DeviceService::new(
        device_repo,
        telemetry_repo,
        vehicle_service.clone(),
    ));
    let insight_service = Arc::new(InsightService::new(
        insight_repo,
        Arc::new(GeminiClient::new(config.genai.clone())?),
        vehicle_service.clone(),
        device_service.clone(),
    ));
    let workshop_service = Arc::new(WorkshopService::new(
        workshop_repo,
        appointment_repo,
        user_service.clone(),
        vehicle_service.clone(),
    ));
    let subscription_service = Arc::new(SubscriptionService::new(
        subscription_repo,
        Arc::new(StripeClient::new(&config.stripe)?),
        user_service.clone(),
        config.stripe.plan_prices.clone(),
        config.stripe.webhook_secret.clone(),
    ));

    let http_addr = config.http_addr();
    let state = AppState {
        config: Arc::new(config),
        db_pool,
        jwt_manager,
        user_service,
        role_service,
        profile_service,
        vehicle_service,
        driver_service,
        device_service,
        subscription_service,
        insight_service,
        workshop_service,
    };

    let metrics_router = Router::new()
        .route("/metrics", get(api::metrics::metrics_handler))
        .with_state(Arc::new(prometheus_handle));
    let app = build_router(state).merge(metrics_router);

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the HTTP router for any state that provides every bounded context.
///
/// HTTP tests call this with an in-memory state so they exercise the same
/// routes and middleware as production.
pub fn build_router<S: DomainRouterState>(state: S) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_state = AuthMiddlewareState::new(state.jwt_manager().clone());

    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        .merge(domains::iam::routes::public_routes::<S>())
        .merge(domains::payments::routes::public_routes::<S>());

    let protected_routes = Router::new()
        .merge(domains::iam::routes::protected_routes::<S>())
        .merge(domains::profiles::routes::protected_routes::<S>())
        .merge(domains::device_management::routes::protected_routes::<S>())
        .merge(domains::devices::routes::protected_routes::<S>())
        .merge(domains::payments::routes::protected_routes::<S>())
        .merge(domains::insights::routes::protected_routes::<S>())
        .merge(domains::workshop::routes::protected_routes::<S>())
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            require_auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::build()))
        .layer(TraceLayer::new_for_http().make_span_with(SanitizedMakeSpan))
        .layer(ObservabilityLayer)
        .layer(cors)
        .with_state(state)
}
