//! A fully materialized input set for the engine.
//!
//! Callers fetch templates, exceptions and appointments from their store and
//! hand them over as one JSON document. Every computation then runs against
//! that snapshot without reaching back to the store.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::appointments::{self, AppointmentRecord};
use crate::availability::BookedByBarber;
use crate::config::EngineConfig;
use crate::error::{Result, ScheduleError};
use crate::schedule::{Barber, ShopSchedule};

/// A bookable service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSnapshot {
    #[serde(default)]
    pub config: EngineConfig,
    #[serde(default)]
    pub shop: ShopSchedule,
    #[serde(default)]
    pub barbers: Vec<Barber>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub appointments: Vec<AppointmentRecord>,
}

impl ScheduleSnapshot {
    /// Parse a snapshot and check its engine configuration.
    ///
    /// Schedule records are not validated here; incomplete days degrade to
    /// "not configured" during resolution. Use [`ScheduleSnapshot::validate`]
    /// for a strict check.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: ScheduleSnapshot = serde_json::from_str(json)?;
        snapshot.config.validate()?;
        Ok(snapshot)
    }

    /// Strictly validate every template, exception and service.
    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        self.shop
            .template
            .validate()
            .map_err(|e| ScheduleError::InvalidConfig(format!("shop template: {e}")))?;
        for exception in &self.shop.exceptions {
            exception.validate()?;
        }
        for barber in &self.barbers {
            if let Some(template) = &barber.template {
                template.validate().map_err(|e| {
                    ScheduleError::InvalidConfig(format!("barber {}: {e}", barber.id))
                })?;
            }
            for exception in &barber.exceptions {
                exception.validate().map_err(|e| {
                    ScheduleError::InvalidConfig(format!("barber {}: {e}", barber.id))
                })?;
            }
        }
        for service in &self.services {
            if service.duration_minutes == 0 {
                return Err(ScheduleError::InvalidDuration(0));
            }
        }
        Ok(())
    }

    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn booked_by_barber(&self, date: NaiveDate) -> BookedByBarber {
        appointments::booked_by_barber(&self.appointments, date, self.config.granularity_minutes)
    }

    pub fn booked_by_date(&self) -> HashMap<NaiveDate, BookedByBarber> {
        appointments::booked_by_date(&self.appointments, self.config.granularity_minutes)
    }
}
