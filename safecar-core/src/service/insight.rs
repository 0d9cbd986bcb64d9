//! Insights business logic: AI generated vehicle reports

use crate::domain::{StringUuid, TelemetryRecord, VehicleInsight, VehicleSnapshot};
use crate::error::{AppError, Result};
use crate::genai::InsightGenerator;
use crate::repository::InsightRepository;
use crate::service::acl::{DeviceManagementContextFacade, DevicesContextFacade};
use chrono::Utc;
use metrics::counter;
use std::fmt::Write;
use std::sync::Arc;
use tracing::{error, info};

/// Telemetry records fed to the model per report
pub const TELEMETRY_SAMPLE_LIMIT: i64 = 50;

pub struct InsightService<R: InsightRepository> {
    repo: Arc<R>,
    generator: Arc<dyn InsightGenerator>,
    vehicles: Arc<dyn DeviceManagementContextFacade>,
    devices: Arc<dyn DevicesContextFacade>,
}

impl<R: InsightRepository> InsightService<R> {
    pub fn new(
        repo: Arc<R>,
        generator: Arc<dyn InsightGenerator>,
        vehicles: Arc<dyn DeviceManagementContextFacade>,
        devices: Arc<dyn DevicesContextFacade>,
    ) -> Self {
        Self {
            repo,
            generator,
            vehicles,
            devices,
        }
    }

    pub async fn generate_for_vehicle(&self, vehicle_id: StringUuid) -> Result<VehicleInsight> {
        let vehicle = self
            .vehicles
            .fetch_vehicle(vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle {} not found", vehicle_id)))?;

        let telemetry = self
            .devices
            .recent_telemetry_for_vehicle(vehicle_id, TELEMETRY_SAMPLE_LIMIT)
            .await?;
        if telemetry.is_empty() {
            return Err(AppError::BadRequest(format!(
                "Vehicle {} has no telemetry to analyse",
                vehicle_id
            )));
        }

        let prompt = build_prompt(&vehicle, &telemetry);
        let draft = self.generator.generate(&prompt).await.map_err(|e| {
            error!(vehicle_id = %vehicle_id, error = %e, "Insight generation failed");
            counter!("safecar_insights_generated_total", "result" => "failure").increment(1);
            match e {
                AppError::Upstream(_) => e,
                other => AppError::Upstream(other.to_string()),
            }
        })?;

        let insight = VehicleInsight {
            id: StringUuid::new_v4(),
            vehicle_id,
            license_plate: vehicle.license_plate,
            risk_level: draft.risk_level,
            maintenance_summary: draft.maintenance_summary,
            driving_summary: draft.driving_summary,
            recommendations: draft.recommendations,
            telemetry_samples: telemetry.len() as i32,
            created_at: Utc::now(),
        };
        let insight = self.repo.create(&insight).await?;
        counter!("safecar_insights_generated_total", "result" => "success").increment(1);
        info!(
            insight_id = %insight.id,
            vehicle_id = %vehicle_id,
            risk_level = %insight.risk_level,
            "Vehicle insight generated"
        );
        Ok(insight)
    }

    pub async fn get(&self, id: StringUuid) -> Result<VehicleInsight> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Insight {} not found", id)))
    }

    pub async fn list_for_vehicle(
        &self,
        vehicle_id: StringUuid,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<VehicleInsight>, i64)> {
        let offset = super::page_offset(page, per_page);
        let insights = self
            .repo
            .list_by_vehicle(vehicle_id, offset, per_page)
            .await?;
        let total = self.repo.count_by_vehicle(vehicle_id).await?;
        Ok((insights, total))
    }

    pub async fn latest_for_vehicle(&self, vehicle_id: StringUuid) -> Result<VehicleInsight> {
        self.repo
            .list_by_vehicle(vehicle_id, 0, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                AppError::NotFound(format!("No insights for vehicle {}", vehicle_id))
            })
    }
}

/// Render the vehicle and its readings as a prompt asking for a JSON report
pub fn build_prompt(vehicle: &VehicleSnapshot, telemetry: &[TelemetryRecord]) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "You are a fleet maintenance analyst. Assess the vehicle below from its \
         most recent telemetry readings.\n\n",
    );
    let _ = writeln!(
        prompt,
        "Vehicle: {} {} ({}), plate {}, mileage {} km",
        vehicle.brand, vehicle.model, vehicle.year, vehicle.license_plate, vehicle.mileage_km
    );

    let count = telemetry.len() as f64;
    let avg = |f: fn(&TelemetryRecord) -> f64| telemetry.iter().map(f).sum::<f64>() / count;
    let max = |f: fn(&TelemetryRecord) -> f64| telemetry.iter().map(f).fold(f64::MIN, f64::max);
    let _ = writeln!(
        prompt,
        "Summary over {} readings: avg speed {:.1} km/h (max {:.1}), avg engine temp {:.1} C \
         (max {:.1}), avg rpm {:.0}, min fuel {:.1}%, min battery {:.2} V",
        telemetry.len(),
        avg(|r| r.speed_kmh),
        max(|r| r.speed_kmh),
        avg(|r| r.engine_temperature_c),
        max(|r| r.engine_temperature_c),
        avg(|r| r.rpm as f64),
        telemetry
            .iter()
            .map(|r| r.fuel_level_pct)
            .fold(f64::MAX, f64::min),
        telemetry
            .iter()
            .map(|r| r.battery_voltage)
            .fold(f64::MAX, f64::min),
    );

    prompt.push_str("\nReadings (newest first): recorded_at, speed_kmh, rpm, engine_temp_c, fuel_pct, battery_v\n");
    for r in telemetry {
        let _ = writeln!(
            prompt,
            "{}, {:.1}, {}, {:.1}, {:.1}, {:.2}",
            r.recorded_at.to_rfc3339(),
            r.speed_kmh,
            r.rpm,
            r.engine_temperature_c,
            r.fuel_level_pct,
            r.battery_voltage
        );
    }

    prompt.push_str(
        "\nAnswer with a single JSON object and nothing else, using exactly these keys:\n\
         {\"risk_level\": \"LOW\" | \"MEDIUM\" | \"HIGH\" | \"CRITICAL\", \
         \"maintenance_summary\": string, \"driving_summary\": string, \
         \"recommendations\": [string]}\n",
    );
    prompt
}
