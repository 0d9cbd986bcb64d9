//! Device management business logic: vehicles and drivers

use crate::domain::{
    normalize_plate, CreateDriverCommand, Driver, RegisterVehicleCommand, StringUuid,
    UpdateVehicleCommand, Vehicle, VehicleSnapshot, VehicleStatus,
};
use crate::error::{AppError, Result};
use crate::repository::{DriverRepository, VehicleRepository};
use crate::service::acl::{DeviceManagementContextFacade, IamContextFacade};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct VehicleService<R: VehicleRepository> {
    repo: Arc<R>,
    iam: Arc<dyn IamContextFacade>,
}

impl<R: VehicleRepository> VehicleService<R> {
    pub fn new(repo: Arc<R>, iam: Arc<dyn IamContextFacade>) -> Self {
        Self { repo, iam }
    }

    pub async fn register(&self, cmd: RegisterVehicleCommand) -> Result<Vehicle> {
        cmd.validate()?;

        if !self.iam.user_exists(cmd.owner_id).await? {
            return Err(AppError::NotFound(format!("User {} not found", cmd.owner_id)));
        }

        let license_plate = normalize_plate(&cmd.license_plate);
        if self.repo.find_by_plate(&license_plate).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Vehicle with plate '{}' already exists",
                license_plate
            )));
        }

        let now = Utc::now();
        let vehicle = Vehicle {
            id: StringUuid::new_v4(),
            owner_id: cmd.owner_id,
            license_plate,
            brand: cmd.brand,
            model: cmd.model,
            year: cmd.year,
            color: cmd.color,
            mileage_km: cmd.mileage_km,
            status: VehicleStatus::Active,
            created_at: now,
            updated_at: now,
        };
        let vehicle = self.repo.create(&vehicle).await?;
        info!(vehicle_id = %vehicle.id, plate = %vehicle.license_plate, "Vehicle registered");
        Ok(vehicle)
    }

    pub async fn get(&self, id: StringUuid) -> Result<Vehicle> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle {} not found", id)))
    }

    pub async fn list(
        &self,
        owner_id: Option<StringUuid>,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Vehicle>, i64)> {
        let offset = super::page_offset(page, per_page);
        let vehicles = self.repo.list(owner_id, offset, per_page).await?;
        let total = self.repo.count(owner_id).await?;
        Ok((vehicles, total))
    }

    pub async fn update(&self, id: StringUuid, cmd: UpdateVehicleCommand) -> Result<Vehicle> {
        cmd.validate()?;
        let mut vehicle = self.get(id).await?;

        if cmd.color.is_some() {
            vehicle.color = cmd.color;
        }
        if let Some(mileage_km) = cmd.mileage_km {
            if mileage_km < vehicle.mileage_km {
                return Err(AppError::BadRequest(format!(
                    "Mileage cannot go down from {} to {}",
                    vehicle.mileage_km, mileage_km
                )));
            }
            vehicle.mileage_km = mileage_km;
        }
        if let Some(status) = cmd.status {
            vehicle.status = status;
        }

        self.repo.update(&vehicle).await
    }

    pub async fn delete(&self, id: StringUuid) -> Result<()> {
        self.repo.delete(id).await?;
        info!(vehicle_id = %id, "Vehicle deleted");
        Ok(())
    }
}

#[async_trait]
impl<R: VehicleRepository + 'static> DeviceManagementContextFacade for VehicleService<R> {
    async fn vehicle_exists(&self, vehicle_id: StringUuid) -> Result<bool> {
        Ok(self.repo.find_by_id(vehicle_id).await?.is_some())
    }

    async fn fetch_vehicle(&self, vehicle_id: StringUuid) -> Result<Option<VehicleSnapshot>> {
        Ok(self
            .repo
            .find_by_id(vehicle_id)
            .await?
            .as_ref()
            .map(VehicleSnapshot::from))
    }
}

pub struct DriverService<D: DriverRepository, V: VehicleRepository> {
    repo: Arc<D>,
    vehicle_repo: Arc<V>,
    iam: Arc<dyn IamContextFacade>,
}

impl<D: DriverRepository, V: VehicleRepository> DriverService<D, V> {
    pub fn new(repo: Arc<D>, vehicle_repo: Arc<V>, iam: Arc<dyn IamContextFacade>) -> Self {
        Self {
            repo,
            vehicle_repo,
            iam,
        }
    }

    pub async fn create(&self, cmd: CreateDriverCommand) -> Result<Driver> {
        cmd.validate()?;

        if !self.iam.user_exists(cmd.user_id).await? {
            return Err(AppError::NotFound(format!("User {} not found", cmd.user_id)));
        }
        if self.repo.find_by_dni(&cmd.dni).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Driver with DNI '{}' already exists",
                cmd.dni
            )));
        }
        let license_number = cmd.license_number.trim().to_uppercase();
        if self
            .repo
            .find_by_license_number(&license_number)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Driver with license '{}' already exists",
                license_number
            )));
        }

        let now = Utc::now();
        let driver = Driver {
            id: StringUuid::new_v4(),
            user_id: cmd.user_id,
            full_name: cmd.full_name,
            dni: cmd.dni,
            license_number,
            phone: cmd.phone,
            vehicle_id: None,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&driver).await
    }

    pub async fn get(&self, id: StringUuid) -> Result<Driver> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Driver {} not found", id)))
    }

    pub async fn list(&self, page: i64, per_page: i64) -> Result<(Vec<Driver>, i64)> {
        let offset = super::page_offset(page, per_page);
        let drivers = self.repo.list(offset, per_page).await?;
        let total = self.repo.count().await?;
        Ok((drivers, total))
    }

    pub async fn assign_to_vehicle(
        &self,
        driver_id: StringUuid,
        vehicle_id: StringUuid,
    ) -> Result<Driver> {
        self.get(driver_id).await?;
        if self.vehicle_repo.find_by_id(vehicle_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Vehicle {} not found", vehicle_id)));
        }

        let driver = self.repo.set_vehicle(driver_id, Some(vehicle_id)).await?;
        info!(driver_id = %driver_id, vehicle_id = %vehicle_id, "Driver assigned to vehicle");
        Ok(driver)
    }

    pub async fn unassign(&self, driver_id: StringUuid) -> Result<Driver> {
        let driver = self.get(driver_id).await?;
        if !driver.is_assigned() {
            return Ok(driver);
        }
        self.repo.set_vehicle(driver_id, None).await
    }

    /// Unassign every driver from a vehicle that is about to go away
    pub async fn release_vehicle(&self, vehicle_id: StringUuid) -> Result<u64> {
        let released = self.repo.clear_vehicle(vehicle_id).await?;
        if released > 0 {
            info!(vehicle_id = %vehicle_id, released, "Drivers released from vehicle");
        }
        Ok(released)
    }

    pub async fn delete(&self, id: StringUuid) -> Result<()> {
        self.repo.delete(id).await
    }
}
