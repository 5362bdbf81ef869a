// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use goodwill::application::{GoodwillService, RecordingNotifier};
use goodwill::config::Config;
use goodwill::domain::{BloodGroup, BloodRequestForm, DonorForm, Gender};
use tempfile::TempDir;

/// Test profile backed by a temporary SQLite database
pub struct TestProfile {
    pub service: GoodwillService,
    pub notifier: Arc<RecordingNotifier>,
    pub config: Config,
    _temp: TempDir,
}

impl TestProfile {
    /// Drop the current service and open the same database again.
    pub async fn reopen(self) -> Result<Self> {
        let TestProfile {
            service,
            config,
            _temp,
            ..
        } = self;
        drop(service);

        let notifier = Arc::new(RecordingNotifier::new());
        let service = GoodwillService::connect(config.clone(), notifier.clone()).await?;
        Ok(Self {
            service,
            notifier,
            config,
            _temp,
        })
    }
}

/// Helper to create a test service with a temporary database
pub async fn test_profile() -> Result<TestProfile> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let config = Config::default()
        .with_database(db_path.to_str().unwrap())
        .with_search_delay(Duration::from_millis(10));

    let notifier = Arc::new(RecordingNotifier::new());
    let service = GoodwillService::init(config.clone(), notifier.clone()).await?;
    Ok(TestProfile {
        service,
        notifier,
        config,
        _temp: temp_dir,
    })
}

pub fn donor_form(name: &str, blood_group: BloodGroup) -> DonorForm {
    DonorForm {
        name: name.to_string(),
        age: 30,
        gender: Gender::Female,
        phone: "555-0199".to_string(),
        blood_group,
        availability: chrono::NaiveDate::from_ymd_opt(2025, 7, 1),
        address: "1 Hospital Rd".to_string(),
        recently_donated: false,
    }
}

pub fn request_form(patient_name: &str, blood_group: BloodGroup) -> BloodRequestForm {
    BloodRequestForm {
        patient_name: patient_name.to_string(),
        age: 52,
        gender: Gender::Male,
        phone: "555-0142".to_string(),
        blood_group,
        units: 2,
        hospital: "City Hospital".to_string(),
        address: "9 Ring Rd".to_string(),
    }
}
