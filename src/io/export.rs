use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::GoodwillService;
use crate::domain::{
    ActivityEntry, BloodRequestRecord, CartLine, CartTotals, DonorRecord, UsageStats,
};

/// Profile snapshot for a full export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub points: i64,
    pub cart: Vec<CartLine>,
    pub cart_totals: CartTotals,
    pub donors: Vec<DonorRecord>,
    pub requests: Vec<BloodRequestRecord>,
    pub stats: UsageStats,
    pub history: Vec<ActivityEntry>,
}

/// Exporter for converting profile data to CSV or JSON
pub struct Exporter<'a> {
    service: &'a GoodwillService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a GoodwillService) -> Self {
        Self { service }
    }

    /// Export the activity history (newest first) to CSV format
    pub async fn export_history_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let history = self.service.history().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "recorded_at", "kind", "points", "details"])?;

        for entry in &history {
            csv_writer.write_record([
                entry.id.to_string(),
                entry.recorded_at.to_rfc3339(),
                entry.kind.as_str().to_string(),
                entry.points.to_string(),
                entry.details.clone(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(history.len())
    }

    /// Export registered donors to CSV format
    pub async fn export_donors_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let donors = self.service.list_donors().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "name",
            "blood_group",
            "age",
            "gender",
            "phone",
            "availability",
            "address",
        ])?;

        for donor in &donors {
            csv_writer.write_record([
                donor.id.to_string(),
                donor.name.clone(),
                donor.blood_group.as_str().to_string(),
                donor.age.to_string(),
                donor.gender.as_str().to_string(),
                donor.phone.clone(),
                donor.availability.format("%Y-%m-%d").to_string(),
                donor.address.clone(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(donors.len())
    }

    /// Export the activity history as a JSON array
    pub async fn export_history_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let history = self.service.history().await?;
        serde_json::to_writer_pretty(&mut writer, &history)?;
        writer.flush()?;
        Ok(history.len())
    }

    /// Export the whole profile as a JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<ProfileSnapshot> {
        let snapshot = ProfileSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            points: self.service.balance(),
            cart: self.service.cart().lines().to_vec(),
            cart_totals: self.service.cart().totals(),
            donors: self.service.list_donors().await?,
            requests: self.service.list_requests().await?,
            stats: self.service.stats().await?,
            history: self.service.history().await?,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
