//! API integration tests infrastructure
//!
//! In-memory repositories behind the production services, so handler tests
//! run without MySQL, Stripe or Gemini.


use async_trait::async_trait;
use chrono::Utc;
use safecar_core::config::JwtConfig;
use safecar_core::domain::{
    Appointment, BusinessProfile, CreateUserInput, Device, DeviceStatus, Driver, PersonProfile,
    Role, RoleRecord, StringUuid, Subscription, SubscriptionStatus, TelemetryRecord, User,
    Vehicle, VehicleInsight, Workshop,
};
use safecar_core::error::{AppError, Result};
use safecar_core::jwt::JwtManager;
use safecar_core::repository::{
    AppointmentRepository, BusinessProfileRepository, DeviceRepository, DriverRepository,
    InsightRepository, PersonProfileRepository, RoleRepository, SubscriptionRepository,
    TelemetryRepository, UserRepository, VehicleRepository, WorkshopRepository,
};
use tokio::sync::RwLock;

// ============================================================================
// Test Configuration
// ============================================================================

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-for-api-testing-purposes".to_string(),
        issuer: "https://safecar.test".to_string(),
        expiration_secs: 3600,
    }
}

pub fn create_test_jwt_manager() -> JwtManager {
    JwtManager::new(test_jwt_config())
}

/// Bearer token for `user` signed with the test secret
pub fn token_for(user: &User) -> String {
    create_test_jwt_manager()
        .create_token(*user.id, &user.username, user.role_names())
        .expect("Failed to create test token")
}

pub fn create_test_user(username: &str, roles: &[Role]) -> User {
    User {
        username: username.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        roles: roles.to_vec(),
        ..User::default()
    }
}

/// Slice `items` the way `LIMIT ? OFFSET ?` would
fn page<T: Clone>(items: impl Iterator<Item = T>, offset: i64, limit: i64) -> Vec<T> {
    items
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

// ============================================================================
// IAM
// ============================================================================

#[derive(Default)]
pub struct TestUserRepository {
    users: RwLock<Vec<User>>,
}

impl TestUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, user: User) {
        self.users.write().await.push(user);
    }
}

#[async_trait]
impl UserRepository for TestUserRepository {
    async fn create(&self, input: &CreateUserInput) -> Result<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == input.username) {
            return Err(AppError::Conflict(format!(
                "Username '{}' is already taken",
                input.username
            )));
        }
        let user = User {
            username: input.username.clone(),
            password_hash: input.password_hash.clone(),
            roles: input.roles.clone(),
            ..User::default()
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>> {
        let users = self.users.read().await;
        Ok(page(users.iter().cloned(), offset, limit))
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.users.read().await.len() as i64)
    }
}

#[derive(Default)]
pub struct TestRoleRepository {
    roles: RwLock<Vec<RoleRecord>>,
}

impl TestRoleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoleRepository for TestRoleRepository {
    async fn list(&self) -> Result<Vec<RoleRecord>> {
        Ok(self.roles.read().await.clone())
    }

    async fn find_by_name(&self, role: Role) -> Result<Option<RoleRecord>> {
        let roles = self.roles.read().await;
        Ok(roles.iter().find(|r| r.name == role).cloned())
    }

    async fn seed(&self, roles: &[Role]) -> Result<()> {
        let mut stored = self.roles.write().await;
        for role in roles {
            if !stored.iter().any(|r| r.name == *role) {
                let id = stored.len() as i64 + 1;
                stored.push(RoleRecord { id, name: *role });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Profiles
// ============================================================================

#[derive(Default)]
pub struct TestPersonProfileRepository {
    profiles: RwLock<Vec<PersonProfile>>,
}

impl TestPersonProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersonProfileRepository for TestPersonProfileRepository {
    async fn create(&self, profile: &PersonProfile) -> Result<PersonProfile> {
        self.profiles.write().await.push(profile.clone());
        Ok(profile.clone())
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<PersonProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_user_id(&self, user_id: StringUuid) -> Result<Option<PersonProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn find_by_dni(&self, dni: &str) -> Result<Option<PersonProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| p.dni == dni).cloned())
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<PersonProfile>> {
        let profiles = self.profiles.read().await;
        Ok(page(profiles.iter().cloned(), offset, limit))
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.profiles.read().await.len() as i64)
    }

    async fn update(&self, profile: &PersonProfile) -> Result<PersonProfile> {
        let mut profiles = self.profiles.write().await;
        let slot = profiles
            .iter_mut()
            .find(|p| p.id == profile.id)
            .ok_or_else(|| AppError::NotFound(format!("Person profile {} not found", profile.id)))?;
        *slot = PersonProfile {
            updated_at: Utc::now(),
            ..profile.clone()
        };
        Ok(slot.clone())
    }
}

#[derive(Default)]
pub struct TestBusinessProfileRepository {
    profiles: RwLock<Vec<BusinessProfile>>,
}

impl TestBusinessProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BusinessProfileRepository for TestBusinessProfileRepository {
    async fn create(&self, profile: &BusinessProfile) -> Result<BusinessProfile> {
        self.profiles.write().await.push(profile.clone());
        Ok(profile.clone())
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<BusinessProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_user_id(&self, user_id: StringUuid) -> Result<Option<BusinessProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn find_by_ruc(&self, ruc: &str) -> Result<Option<BusinessProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| p.ruc == ruc).cloned())
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<BusinessProfile>> {
        let profiles = self.profiles.read().await;
        Ok(page(profiles.iter().cloned(), offset, limit))
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.profiles.read().await.len() as i64)
    }

    async fn update(&self, profile: &BusinessProfile) -> Result<BusinessProfile> {
        let mut profiles = self.profiles.write().await;
        let slot = profiles
            .iter_mut()
            .find(|p| p.id == profile.id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Business profile {} not found", profile.id))
            })?;
        *slot = BusinessProfile {
            updated_at: Utc::now(),
            ..profile.clone()
        };
        Ok(slot.clone())
    }
}

// ============================================================================
// Device management
// ============================================================================

#[derive(Default)]
pub struct TestVehicleRepository {
    vehicles: RwLock<Vec<Vehicle>>,
}

impl TestVehicleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_vehicle(&self, vehicle: Vehicle) {
        self.vehicles.write().await.push(vehicle);
    }
}

#[async_trait]
impl VehicleRepository for TestVehicleRepository {
    async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle> {
        self.vehicles.write().await.push(vehicle.clone());
        Ok(vehicle.clone())
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Vehicle>> {
        let vehicles = self.vehicles.read().await;
        Ok(vehicles.iter().find(|v| v.id == id).cloned())
    }

    async fn find_by_plate(&self, license_plate: &str) -> Result<Option<Vehicle>> {
        let vehicles = self.vehicles.read().await;
        Ok(vehicles
            .iter()
            .find(|v| v.license_plate == license_plate)
            .cloned())
    }

    async fn list(
        &self,
        owner_id: Option<StringUuid>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Vehicle>> {
        let vehicles = self.vehicles.read().await;
        let filtered = vehicles
            .iter()
            .filter(|v| owner_id.is_none_or(|owner| v.owner_id == owner))
            .cloned();
        Ok(page(filtered, offset, limit))
    }

    async fn count(&self, owner_id: Option<StringUuid>) -> Result<i64> {
        let vehicles = self.vehicles.read().await;
        Ok(vehicles
            .iter()
            .filter(|v| owner_id.is_none_or(|owner| v.owner_id == owner))
            .count() as i64)
    }

    async fn update(&self, vehicle: &Vehicle) -> Result<Vehicle> {
        let mut vehicles = self.vehicles.write().await;
        let slot = vehicles
            .iter_mut()
            .find(|v| v.id == vehicle.id)
            .ok_or_else(|| AppError::NotFound(format!("Vehicle {} not found", vehicle.id)))?;
        *slot = Vehicle {
            updated_at: Utc::now(),
            ..vehicle.clone()
        };
        Ok(slot.clone())
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        let mut vehicles = self.vehicles.write().await;
        let before = vehicles.len();
        vehicles.retain(|v| v.id != id);
        if vehicles.len() == before {
            return Err(AppError::NotFound(format!("Vehicle {} not found", id)));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct TestDriverRepository {
    drivers: RwLock<Vec<Driver>>,
}

impl TestDriverRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DriverRepository for TestDriverRepository {
    async fn create(&self, driver: &Driver) -> Result<Driver> {
        self.drivers.write().await.push(driver.clone());
        Ok(driver.clone())
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Driver>> {
        let drivers = self.drivers.read().await;
        Ok(drivers.iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_dni(&self, dni: &str) -> Result<Option<Driver>> {
        let drivers = self.drivers.read().await;
        Ok(drivers.iter().find(|d| d.dni == dni).cloned())
    }

    async fn find_by_license_number(&self, license_number: &str) -> Result<Option<Driver>> {
        let drivers = self.drivers.read().await;
        Ok(drivers
            .iter()
            .find(|d| d.license_number == license_number)
            .cloned())
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Driver>> {
        let drivers = self.drivers.read().await;
        Ok(page(drivers.iter().cloned(), offset, limit))
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.drivers.read().await.len() as i64)
    }

    async fn set_vehicle(&self, id: StringUuid, vehicle_id: Option<StringUuid>) -> Result<Driver> {
        let mut drivers = self.drivers.write().await;
        let driver = drivers
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Driver {} not found", id)))?;
        driver.vehicle_id = vehicle_id;
        driver.updated_at = Utc::now();
        Ok(driver.clone())
    }

    async fn clear_vehicle(&self, vehicle_id: StringUuid) -> Result<u64> {
        let mut drivers = self.drivers.write().await;
        let mut cleared = 0;
        for driver in drivers.iter_mut().filter(|d| d.vehicle_id == Some(vehicle_id)) {
            driver.vehicle_id = None;
            driver.updated_at = Utc::now();
            cleared += 1;
        }
        Ok(cleared)
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        let mut drivers = self.drivers.write().await;
        let before = drivers.len();
        drivers.retain(|d| d.id != id);
        if drivers.len() == before {
            return Err(AppError::NotFound(format!("Driver {} not found", id)));
        }
        Ok(())
    }
}

// ============================================================================
// Devices
// ============================================================================

#[derive(Default)]
pub struct TestDeviceRepository {
    devices: RwLock<Vec<Device>>,
}

impl TestDeviceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify(&self, id: StringUuid, f: impl FnOnce(&mut Device)) -> Result<Device> {
        let mut devices = self.devices.write().await;
        let device = devices
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Device {} not found", id)))?;
        f(device);
        device.updated_at = Utc::now();
        Ok(device.clone())
    }
}

#[async_trait]
impl DeviceRepository for TestDeviceRepository {
    async fn create(&self, device: &Device) -> Result<Device> {
        self.devices.write().await.push(device.clone());
        Ok(device.clone())
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Device>> {
        let devices = self.devices.read().await;
        Ok(devices.iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_mac(&self, mac_address: &str) -> Result<Option<Device>> {
        let devices = self.devices.read().await;
        Ok(devices
            .iter()
            .find(|d| d.mac_address == mac_address)
            .cloned())
    }

    async fn list(
        &self,
        vehicle_id: Option<StringUuid>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Device>> {
        let devices = self.devices.read().await;
        let filtered = devices
            .iter()
            .filter(|d| vehicle_id.is_none_or(|v| d.vehicle_id == Some(v)))
            .cloned();
        Ok(page(filtered, offset, limit))
    }

    async fn count(&self, vehicle_id: Option<StringUuid>) -> Result<i64> {
        let devices = self.devices.read().await;
        Ok(devices
            .iter()
            .filter(|d| vehicle_id.is_none_or(|v| d.vehicle_id == Some(v)))
            .count() as i64)
    }

    async fn set_vehicle(&self, id: StringUuid, vehicle_id: Option<StringUuid>) -> Result<Device> {
        self.modify(id, |d| d.vehicle_id = vehicle_id).await
    }

    async fn set_status(&self, id: StringUuid, status: DeviceStatus) -> Result<Device> {
        self.modify(id, |d| d.status = status).await
    }

    async fn clear_vehicle(&self, vehicle_id: StringUuid) -> Result<u64> {
        let mut devices = self.devices.write().await;
        let mut cleared = 0;
        for device in devices.iter_mut().filter(|d| d.vehicle_id == Some(vehicle_id)) {
            device.vehicle_id = None;
            device.updated_at = Utc::now();
            cleared += 1;
        }
        Ok(cleared)
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        let mut devices = self.devices.write().await;
        let before = devices.len();
        devices.retain(|d| d.id != id);
        if devices.len() == before {
            return Err(AppError::NotFound(format!("Device {} not found", id)));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct TestTelemetryRepository {
    records: RwLock<Vec<TelemetryRecord>>,
}

impl TestTelemetryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn newest_first(
        &self,
        keep: impl Fn(&TelemetryRecord) -> bool,
        limit: i64,
    ) -> Vec<TelemetryRecord> {
        let records = self.records.read().await;
        let mut matching: Vec<TelemetryRecord> =
            records.iter().filter(|r| keep(r)).cloned().collect();
        matching.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        matching.truncate(limit.max(0) as usize);
        matching
    }
}

#[async_trait]
impl TelemetryRepository for TestTelemetryRepository {
    async fn create(&self, record: &TelemetryRecord) -> Result<TelemetryRecord> {
        self.records.write().await.push(record.clone());
        Ok(record.clone())
    }

    async fn list_by_device(
        &self,
        device_id: StringUuid,
        limit: i64,
    ) -> Result<Vec<TelemetryRecord>> {
        Ok(self
            .newest_first(|r| r.device_id == device_id, limit)
            .await)
    }

    async fn list_by_vehicle(
        &self,
        vehicle_id: StringUuid,
        limit: i64,
    ) -> Result<Vec<TelemetryRecord>> {
        Ok(self
            .newest_first(|r| r.vehicle_id == vehicle_id, limit)
            .await)
    }
}

// ============================================================================
// Payments
// ============================================================================

#[derive(Default)]
pub struct TestSubscriptionRepository {
    subscriptions: RwLock<Vec<Subscription>>,
}

impl TestSubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_subscription(&self, subscription: Subscription) {
        self.subscriptions.write().await.push(subscription);
    }
}

#[async_trait]
impl SubscriptionRepository for TestSubscriptionRepository {
    async fn create(&self, subscription: &Subscription) -> Result<Subscription> {
        self.subscriptions.write().await.push(subscription.clone());
        Ok(subscription.clone())
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Subscription>> {
        let subscriptions = self.subscriptions.read().await;
        Ok(subscriptions.iter().find(|s| s.id == id).cloned())
    }

    async fn find_latest_by_user(&self, user_id: StringUuid) -> Result<Option<Subscription>> {
        let subscriptions = self.subscriptions.read().await;
        Ok(subscriptions
            .iter()
            .filter(|s| s.user_id == user_id)
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    async fn find_by_user_and_status(
        &self,
        user_id: StringUuid,
        status: SubscriptionStatus,
    ) -> Result<Option<Subscription>> {
        let subscriptions = self.subscriptions.read().await;
        Ok(subscriptions
            .iter()
            .find(|s| s.user_id == user_id && s.status == status)
            .cloned())
    }

    async fn find_by_checkout_session(&self, session_id: &str) -> Result<Option<Subscription>> {
        let subscriptions = self.subscriptions.read().await;
        Ok(subscriptions
            .iter()
            .find(|s| s.stripe_checkout_session_id.as_deref() == Some(session_id))
            .cloned())
    }

    async fn find_by_stripe_subscription(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>> {
        let subscriptions = self.subscriptions.read().await;
        Ok(subscriptions
            .iter()
            .find(|s| s.stripe_subscription_id.as_deref() == Some(stripe_subscription_id))
            .cloned())
    }

    async fn update(&self, subscription: &Subscription) -> Result<Subscription> {
        let mut subscriptions = self.subscriptions.write().await;
        let slot = subscriptions
            .iter_mut()
            .find(|s| s.id == subscription.id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Subscription {} not found", subscription.id))
            })?;
        *slot = Subscription {
            updated_at: Utc::now(),
            ..subscription.clone()
        };
        Ok(slot.clone())
    }
}

// ============================================================================
// Insights
// ============================================================================

#[derive(Default)]
pub struct TestInsightRepository {
    insights: RwLock<Vec<VehicleInsight>>,
}

impl TestInsightRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InsightRepository for TestInsightRepository {
    async fn create(&self, insight: &VehicleInsight) -> Result<VehicleInsight> {
        self.insights.write().await.push(insight.clone());
        Ok(insight.clone())
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<VehicleInsight>> {
        let insights = self.insights.read().await;
        Ok(insights.iter().find(|i| i.id == id).cloned())
    }

    async fn list_by_vehicle(
        &self,
        vehicle_id: StringUuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<VehicleInsight>> {
        let insights = self.insights.read().await;
        let mut matching: Vec<VehicleInsight> = insights
            .iter()
            .filter(|i| i.vehicle_id == vehicle_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(matching.into_iter(), offset, limit))
    }

    async fn count_by_vehicle(&self, vehicle_id: StringUuid) -> Result<i64> {
        let insights = self.insights.read().await;
        Ok(insights.iter().filter(|i| i.vehicle_id == vehicle_id).count() as i64)
    }
}

// ============================================================================
// Workshop
// ============================================================================

#[derive(Default)]
pub struct TestWorkshopRepository {
    workshops: RwLock<Vec<Workshop>>,
}

impl TestWorkshopRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkshopRepository for TestWorkshopRepository {
    async fn create(&self, workshop: &Workshop) -> Result<Workshop> {
        self.workshops.write().await.push(workshop.clone());
        Ok(workshop.clone())
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Workshop>> {
        let workshops = self.workshops.read().await;
        Ok(workshops.iter().find(|w| w.id == id).cloned())
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Workshop>> {
        let workshops = self.workshops.read().await;
        Ok(page(workshops.iter().cloned(), offset, limit))
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.workshops.read().await.len() as i64)
    }

    async fn update(&self, workshop: &Workshop) -> Result<Workshop> {
        let mut workshops = self.workshops.write().await;
        let slot = workshops
            .iter_mut()
            .find(|w| w.id == workshop.id)
            .ok_or_else(|| AppError::NotFound(format!("Workshop {} not found", workshop.id)))?;
        *slot = Workshop {
            updated_at: Utc::now(),
            ..workshop.clone()
        };
        Ok(slot.clone())
    }
}

#[derive(Default)]
pub struct TestAppointmentRepository {
    appointments: RwLock<Vec<Appointment>>,
}

impl TestAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AppointmentRepository for TestAppointmentRepository {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment> {
        self.appointments.write().await.push(appointment.clone());
        Ok(appointment.clone())
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Appointment>> {
        let appointments = self.appointments.read().await;
        Ok(appointments.iter().find(|a| a.id == id).cloned())
    }

    async fn list_by_workshop(
        &self,
        workshop_id: StringUuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Appointment>> {
        let appointments = self.appointments.read().await;
        let filtered = appointments
            .iter()
            .filter(|a| a.workshop_id == workshop_id)
            .cloned();
        Ok(page(filtered, offset, limit))
    }

    async fn count_by_workshop(&self, workshop_id: StringUuid) -> Result<i64> {
        let appointments = self.appointments.read().await;
        Ok(appointments
            .iter()
            .filter(|a| a.workshop_id == workshop_id)
            .count() as i64)
    }

    async fn list_by_customer(
        &self,
        customer_id: StringUuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Appointment>> {
        let appointments = self.appointments.read().await;
        let filtered = appointments
            .iter()
            .filter(|a| a.customer_id == customer_id)
            .cloned();
        Ok(page(filtered, offset, limit))
    }

    async fn count_by_customer(&self, customer_id: StringUuid) -> Result<i64> {
        let appointments = self.appointments.read().await;
        Ok(appointments
            .iter()
            .filter(|a| a.customer_id == customer_id)
            .count() as i64)
    }

    async fn update(&self, appointment: &Appointment) -> Result<Appointment> {
        let mut appointments = self.appointments.write().await;
        let slot = appointments
            .iter_mut()
            .find(|a| a.id == appointment.id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Appointment {} not found", appointment.id))
            })?;
        *slot = Appointment {
            updated_at: Utc::now(),
            ..appointment.clone()
        };
        Ok(slot.clone())
    }
}
