use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::BloodGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Donor registration as submitted.
#[derive(Debug, Clone)]
pub struct DonorForm {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub phone: String,
    pub blood_group: BloodGroup,
    pub availability: Option<NaiveDate>,
    pub address: String,
    /// Donated within the last two months
    pub recently_donated: bool,
}

/// Accepted donor ages, inclusive.
pub const DONOR_AGE_RANGE: std::ops::RangeInclusive<u32> = 16..=65;

/// Why a donor registration was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EligibilityError {
    MissingField(&'static str),
    AgeOutOfRange(u32),
    RecentlyDonated,
    MissingAvailability,
}

impl fmt::Display for EligibilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EligibilityError::MissingField(field) => write!(f, "{} is required", field),
            EligibilityError::AgeOutOfRange(_) => write!(
                f,
                "Donors must be between {} and {} years old.",
                DONOR_AGE_RANGE.start(),
                DONOR_AGE_RANGE.end()
            ),
            EligibilityError::RecentlyDonated => write!(
                f,
                "You cannot donate if you have donated within the last 2 months"
            ),
            EligibilityError::MissingAvailability => {
                write!(f, "Please select your availability date")
            }
        }
    }
}

impl std::error::Error for EligibilityError {}

impl EligibilityError {
    /// Short headline shown to the user.
    pub fn title(&self) -> &'static str {
        match self {
            EligibilityError::AgeOutOfRange(_) => "Age restriction",
            _ => "Registration refused",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorRecord {
    pub id: Uuid,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub phone: String,
    pub blood_group: BloodGroup,
    pub availability: NaiveDate,
    pub address: String,
    pub registered_at: DateTime<Utc>,
}

impl DonorRecord {
    /// Validate a registration form and turn it into a record.
    pub fn register(form: DonorForm) -> Result<Self, EligibilityError> {
        if form.name.trim().is_empty() {
            return Err(EligibilityError::MissingField("name"));
        }
        if form.phone.trim().is_empty() {
            return Err(EligibilityError::MissingField("phone"));
        }
        if !DONOR_AGE_RANGE.contains(&form.age) {
            return Err(EligibilityError::AgeOutOfRange(form.age));
        }
        if form.recently_donated {
            return Err(EligibilityError::RecentlyDonated);
        }
        let availability = form
            .availability
            .ok_or(EligibilityError::MissingAvailability)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name: form.name,
            age: form.age,
            gender: form.gender,
            phone: form.phone,
            blood_group: form.blood_group,
            availability,
            address: form.address,
            registered_at: Utc::now(),
        })
    }
}

/// Blood request as submitted by a patient or relative.
#[derive(Debug, Clone)]
pub struct BloodRequestForm {
    pub patient_name: String,
    pub age: u32,
    pub gender: Gender,
    pub phone: String,
    pub blood_group: BloodGroup,
    pub units: u32,
    pub hospital: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodRequestRecord {
    pub id: Uuid,
    pub patient_name: String,
    pub age: u32,
    pub gender: Gender,
    pub phone: String,
    pub blood_group: BloodGroup,
    pub units: u32,
    pub hospital: String,
    pub address: String,
    pub submitted_at: DateTime<Utc>,
}

impl BloodRequestRecord {
    pub fn submit(form: BloodRequestForm) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_name: form.patient_name,
            age: form.age,
            gender: form.gender,
            phone: form.phone,
            blood_group: form.blood_group,
            units: form.units,
            hospital: form.hospital,
            address: form.address,
            submitted_at: Utc::now(),
        }
    }
}

/// A directory row shown to someone looking for donors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorListing {
    pub name: String,
    pub blood_group: BloodGroup,
    pub age: u32,
    pub gender: Gender,
    pub phone: String,
    pub address: String,
    pub availability: String,
}

impl From<&DonorRecord> for DonorListing {
    fn from(record: &DonorRecord) -> Self {
        Self {
            name: record.name.clone(),
            blood_group: record.blood_group,
            age: record.age,
            gender: record.gender,
            phone: record.phone.clone(),
            address: record.address.clone(),
            availability: record.availability.format("%Y-%m-%d").to_string(),
        }
    }
}

/// A patient currently waiting for blood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub blood_group: BloodGroup,
    pub quantity: String,
    pub address: String,
    pub distance: String,
}

fn patient(id: i64, name: &str, blood_group: BloodGroup, quantity: &str, address: &str, distance: &str) -> Patient {
    Patient {
        id,
        name: name.to_string(),
        blood_group,
        quantity: quantity.to_string(),
        address: address.to_string(),
        distance: distance.to_string(),
    }
}

/// Built-in list of patients in need.
pub fn patients_in_need() -> Vec<Patient> {
    vec![
        patient(1, "Rahul Kumar", BloodGroup::APositive, "2 units", "AIIMS Hospital, Delhi", "3.5 km"),
        patient(2, "Priya Singh", BloodGroup::AbPositive, "4 units", "SH 9, RWF West Colony, Yelahanka New Town", "2 km"),
        patient(3, "Ajay Sharma", BloodGroup::OPositive, "1 unit", "Fortis Hospital, Bangalore", "5.2 km"),
        patient(4, "Sonia Mehta", BloodGroup::APositive, "3 units", "Apollo Hospital, Chennai", "4.7 km"),
    ]
}

/// A blood collection point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub distance: String,
    pub hours: String,
}

/// Built-in directory of nearby hospitals.
pub fn hospitals() -> Vec<Hospital> {
    let hospital = |id: i64, name: &str, address: &str, distance: &str, hours: &str| Hospital {
        id,
        name: name.to_string(),
        address: address.to_string(),
        distance: distance.to_string(),
        hours: hours.to_string(),
    };

    vec![
        hospital(1, "City General Hospital", "123 Main Street, Downtown, 10001", "2.5 km", "Open 24 hours"),
        hospital(2, "Mercy Medical Center", "456 Park Avenue, Midtown, 10002", "3.8 km", "Open 24 hours"),
        hospital(3, "St. John's Hospital", "789 Broadway, Uptown, 10003", "5.2 km", "8:00 AM - 8:00 PM"),
    ]
}

/// Sample donors shown when nobody registered matches, relabelled with the
/// requested group.
pub fn sample_donors(blood_group: BloodGroup) -> Vec<DonorListing> {
    let sample = |name: &str, age: u32, gender: Gender, phone: &str, address: &str, availability: &str| {
        DonorListing {
            name: name.to_string(),
            blood_group,
            age,
            gender,
            phone: phone.to_string(),
            address: address.to_string(),
            availability: availability.to_string(),
        }
    };

    vec![
        sample("John Smith", 32, Gender::Male, "555-0123", "123 Main St", "Weekdays"),
        sample("Sarah Johnson", 28, Gender::Female, "555-0124", "456 Oak Ave", "Weekends"),
        sample("Michael Brown", 45, Gender::Male, "555-0125", "789 Pine Rd", "Evenings"),
    ]
}

/// Registered donors with exactly `blood_group`.
pub fn match_donors(donors: &[DonorRecord], blood_group: BloodGroup) -> Vec<DonorListing> {
    donors
        .iter()
        .filter(|d| d.blood_group == blood_group)
        .map(DonorListing::from)
        .collect()
}

/// Patients with exactly `blood_group`.
pub fn match_patients(patients: &[Patient], blood_group: BloodGroup) -> Vec<Patient> {
    patients
        .iter()
        .filter(|p| p.blood_group == blood_group)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> DonorForm {
        DonorForm {
            name: "Asha".into(),
            age: 29,
            gender: Gender::Female,
            phone: "555-0100".into(),
            blood_group: BloodGroup::ONegative,
            availability: NaiveDate::from_ymd_opt(2025, 6, 1),
            address: "12 Lake Rd".into(),
            recently_donated: false,
        }
    }

    #[test]
    fn test_register_valid_donor() {
        let record = DonorRecord::register(sample_form()).unwrap();
        assert_eq!(record.name, "Asha");
        assert_eq!(record.blood_group, BloodGroup::ONegative);
    }

    #[test]
    fn test_register_rejects_recent_donor() {
        let form = DonorForm {
            recently_donated: true,
            ..sample_form()
        };
        assert_eq!(
            DonorRecord::register(form),
            Err(EligibilityError::RecentlyDonated)
        );
    }

    #[test]
    fn test_register_enforces_age_range() {
        for age in [15, 66, 90] {
            let form = DonorForm {
                age,
                ..sample_form()
            };
            assert_eq!(
                DonorRecord::register(form),
                Err(EligibilityError::AgeOutOfRange(age))
            );
        }
        for age in [16, 65] {
            let form = DonorForm {
                age,
                ..sample_form()
            };
            assert!(DonorRecord::register(form).is_ok());
        }
    }

    #[test]
    fn test_register_requires_availability() {
        let form = DonorForm {
            availability: None,
            ..sample_form()
        };
        assert_eq!(
            DonorRecord::register(form),
            Err(EligibilityError::MissingAvailability)
        );
    }

    #[test]
    fn test_register_requires_name() {
        let form = DonorForm {
            name: "  ".into(),
            ..sample_form()
        };
        assert_eq!(
            DonorRecord::register(form),
            Err(EligibilityError::MissingField("name"))
        );
    }

    #[test]
    fn test_match_donors_exact_group_only() {
        let o_neg = DonorRecord::register(sample_form()).unwrap();
        let o_pos = DonorRecord::register(DonorForm {
            blood_group: BloodGroup::OPositive,
            ..sample_form()
        })
        .unwrap();

        let matches = match_donors(&[o_neg, o_pos], BloodGroup::ONegative);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].blood_group, BloodGroup::ONegative);
        assert_eq!(matches[0].availability, "2025-06-01");
    }

    #[test]
    fn test_match_patients() {
        let matches = match_patients(&patients_in_need(), BloodGroup::APositive);
        let names: Vec<_> = matches.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Rahul Kumar", "Sonia Mehta"]);

        assert!(match_patients(&patients_in_need(), BloodGroup::BNegative).is_empty());
    }

    #[test]
    fn test_hospital_ids_are_unique() {
        let ids: std::collections::HashSet<_> = hospitals().iter().map(|h| h.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_sample_donors_use_requested_group() {
        let samples = sample_donors(BloodGroup::BNegative);
        assert_eq!(samples.len(), 3);
        assert!(samples.iter().all(|d| d.blood_group == BloodGroup::BNegative));
    }
}
