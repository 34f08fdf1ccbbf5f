//! Record Store seam
//!
//! The engine never owns measurement data; it queries a [`RecordStore`] at
//! call time. This module defines that seam plus an in-memory, JSON-backed
//! implementation used by the CLI and tests. A production deployment would
//! implement the trait over its own storage.

use crate::brackets::AgeBracket;
use crate::error::ScoreError;
use crate::types::{
    BloodMetrics, Domain, MetricRecord, PhysicalMetrics, SleepMetrics,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Read-only source of measurement records and user ages
///
/// Per-user fetches return records in ascending date order. Cohort fetches
/// return every record of every user whose age falls in the bracket
/// (half-open [`AgeBracket::contains`]; at the bracket-table seams this is
/// not the same rule as [`crate::brackets::resolve_age_bracket`], so a
/// seam-age user can be absent from their own resolved cohort), with one
/// user's records contiguous so grouping by user is implicit. The store,
/// not the engine, enforces the one-record-per-(user, domain, date)
/// invariant.
pub trait RecordStore {
    /// Resolve a user's age, failing with [`ScoreError::UserNotFound`]
    fn user_age(&self, user_id: &str) -> Result<i32, ScoreError>;

    fn physical_records(&self, user_id: &str) -> Vec<MetricRecord<PhysicalMetrics>>;
    fn sleep_records(&self, user_id: &str) -> Vec<MetricRecord<SleepMetrics>>;
    fn blood_records(&self, user_id: &str) -> Vec<MetricRecord<BloodMetrics>>;

    fn cohort_physical_records(&self, bracket: AgeBracket) -> Vec<MetricRecord<PhysicalMetrics>>;
    fn cohort_sleep_records(&self, bracket: AgeBracket) -> Vec<MetricRecord<SleepMetrics>>;
    fn cohort_blood_records(&self, bracket: AgeBracket) -> Vec<MetricRecord<BloodMetrics>>;
}

/// One dated row in a dataset domain list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatedMetrics<M> {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub metrics: M,
}

/// One user's profile and full measurement history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub age: i32,
    #[serde(default)]
    pub physical: Vec<DatedMetrics<PhysicalMetrics>>,
    #[serde(default)]
    pub sleep: Vec<DatedMetrics<SleepMetrics>>,
    #[serde(default)]
    pub blood: Vec<DatedMetrics<BloodMetrics>>,
}

/// A complete dataset: every known user with their records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub users: Vec<UserProfile>,
}

impl Dataset {
    /// Load a dataset from JSON
    pub fn from_json(json: &str) -> Result<Self, ScoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the dataset to JSON
    pub fn to_json(&self) -> Result<String, ScoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Small seeded dataset: three users, one day of data each
    pub fn demo() -> Self {
        let json = r#"{
            "users": [
                {
                    "user_id": "john", "name": "John", "age": 30,
                    "physical": [{"date": "2021-10-10", "steps": 1000, "cardio_session_minutes": 30, "strength_session_minutes": 30}],
                    "sleep": [{"date": "2021-10-10", "sleep_hours": 8, "avg_heart_rate": 60, "avg_oxygen_level": 90}],
                    "blood": [{"date": "2021-10-10", "rbc": 5.0, "wbc": 5.0, "glucose_level": 100, "cholesterol_level": 100, "triglycerides_level": 100}]
                },
                {
                    "user_id": "alice", "name": "Alice", "age": 25,
                    "physical": [{"date": "2021-10-11", "steps": 2000, "cardio_session_minutes": 60, "strength_session_minutes": 60}],
                    "sleep": [{"date": "2021-10-11", "sleep_hours": 7, "avg_heart_rate": 65, "avg_oxygen_level": 85}],
                    "blood": [{"date": "2021-10-11", "rbc": 4.5, "wbc": 4.5, "glucose_level": 90, "cholesterol_level": 90, "triglycerides_level": 90}]
                },
                {
                    "user_id": "bob", "name": "Bob", "age": 35,
                    "physical": [{"date": "2021-10-12", "steps": 3000, "cardio_session_minutes": 90, "strength_session_minutes": 90}],
                    "sleep": [{"date": "2021-10-12", "sleep_hours": 6, "avg_heart_rate": 70, "avg_oxygen_level": 80}],
                    "blood": [{"date": "2021-10-12", "rbc": 4.0, "wbc": 4.0, "glucose_level": 80, "cholesterol_level": 80, "triglycerides_level": 80}]
                }
            ]
        }"#;
        serde_json::from_str(json).expect("demo dataset is valid JSON")
    }
}

/// One problem found while validating a dataset
#[derive(Debug, Clone, Serialize)]
pub struct DatasetIssue {
    pub user_id: String,
    pub domain: Option<Domain>,
    pub message: String,
}

/// Check the invariants the engine consumes as given
///
/// Finds duplicate user ids, negative ages, and duplicate
/// (user, domain, date) rows. Returns an empty list for a clean dataset.
pub fn validate_dataset(dataset: &Dataset) -> Vec<DatasetIssue> {
    let mut issues = Vec::new();
    let mut seen_users: HashSet<&str> = HashSet::new();

    for user in &dataset.users {
        if !seen_users.insert(user.user_id.as_str()) {
            issues.push(DatasetIssue {
                user_id: user.user_id.clone(),
                domain: None,
                message: "Duplicate user id".to_string(),
            });
        }
        if user.age < 0 {
            issues.push(DatasetIssue {
                user_id: user.user_id.clone(),
                domain: None,
                message: format!("Age cannot be negative: {}", user.age),
            });
        }

        check_duplicate_dates(user, Domain::Physical, user.physical.iter().map(|r| r.date), &mut issues);
        check_duplicate_dates(user, Domain::Sleep, user.sleep.iter().map(|r| r.date), &mut issues);
        check_duplicate_dates(user, Domain::Blood, user.blood.iter().map(|r| r.date), &mut issues);
    }

    issues
}

fn check_duplicate_dates(
    user: &UserProfile,
    domain: Domain,
    dates: impl Iterator<Item = NaiveDate>,
    issues: &mut Vec<DatasetIssue>,
) {
    let mut seen: HashSet<NaiveDate> = HashSet::new();
    for date in dates {
        if !seen.insert(date) {
            issues.push(DatasetIssue {
                user_id: user.user_id.clone(),
                domain: Some(domain),
                message: format!("More than one {domain} record on {date}"),
            });
        }
    }
}

/// In-memory [`RecordStore`] over a [`Dataset`]
///
/// Records are sorted by date at construction so fetches honor the
/// ascending-date contract regardless of dataset order.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    users: BTreeMap<String, UserProfile>,
}

impl MemoryRecordStore {
    /// Build a store from a dataset
    pub fn from_dataset(dataset: Dataset) -> Self {
        let mut users = BTreeMap::new();
        for mut user in dataset.users {
            user.physical.sort_by_key(|r| r.date);
            user.sleep.sort_by_key(|r| r.date);
            user.blood.sort_by_key(|r| r.date);
            users.insert(user.user_id.clone(), user);
        }
        Self { users }
    }

    /// Build a store from dataset JSON
    pub fn from_json(json: &str) -> Result<Self, ScoreError> {
        Ok(Self::from_dataset(Dataset::from_json(json)?))
    }

    fn profile(&self, user_id: &str) -> Option<&UserProfile> {
        self.users.get(user_id)
    }

    fn cohort_profiles(&self, bracket: AgeBracket) -> impl Iterator<Item = &UserProfile> {
        self.users
            .values()
            .filter(move |user| bracket.contains(user.age))
    }
}

fn to_records<M: Clone>(user_id: &str, rows: &[DatedMetrics<M>]) -> Vec<MetricRecord<M>> {
    rows.iter()
        .map(|row| MetricRecord::new(user_id, row.date, row.metrics.clone()))
        .collect()
}

impl RecordStore for MemoryRecordStore {
    fn user_age(&self, user_id: &str) -> Result<i32, ScoreError> {
        self.profile(user_id)
            .map(|user| user.age)
            .ok_or(ScoreError::UserNotFound)
    }

    fn physical_records(&self, user_id: &str) -> Vec<MetricRecord<PhysicalMetrics>> {
        self.profile(user_id)
            .map(|user| to_records(user_id, &user.physical))
            .unwrap_or_default()
    }

    fn sleep_records(&self, user_id: &str) -> Vec<MetricRecord<SleepMetrics>> {
        self.profile(user_id)
            .map(|user| to_records(user_id, &user.sleep))
            .unwrap_or_default()
    }

    fn blood_records(&self, user_id: &str) -> Vec<MetricRecord<BloodMetrics>> {
        self.profile(user_id)
            .map(|user| to_records(user_id, &user.blood))
            .unwrap_or_default()
    }

    fn cohort_physical_records(&self, bracket: AgeBracket) -> Vec<MetricRecord<PhysicalMetrics>> {
        self.cohort_profiles(bracket)
            .flat_map(|user| to_records(&user.user_id, &user.physical))
            .collect()
    }

    fn cohort_sleep_records(&self, bracket: AgeBracket) -> Vec<MetricRecord<SleepMetrics>> {
        self.cohort_profiles(bracket)
            .flat_map(|user| to_records(&user.user_id, &user.sleep))
            .collect()
    }

    fn cohort_blood_records(&self, bracket: AgeBracket) -> Vec<MetricRecord<BloodMetrics>> {
        self.cohort_profiles(bracket)
            .flat_map(|user| to_records(&user.user_id, &user.blood))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_demo_dataset_round_trips_json() {
        let dataset = Dataset::demo();
        assert_eq!(dataset.users.len(), 3);

        let json = dataset.to_json().unwrap();
        let loaded = Dataset::from_json(&json).unwrap();
        assert_eq!(loaded.users.len(), 3);
        assert_eq!(loaded.users[0].physical[0].metrics.steps, 1000.0);
    }

    #[test]
    fn test_user_age_and_missing_user() {
        let store = MemoryRecordStore::from_dataset(Dataset::demo());
        assert_eq!(store.user_age("john").unwrap(), 30);
        assert!(matches!(
            store.user_age("nobody"),
            Err(ScoreError::UserNotFound)
        ));
    }

    #[test]
    fn test_fetches_are_date_ordered() {
        let json = r#"{
            "users": [{
                "user_id": "zoe", "name": "Zoe", "age": 30,
                "physical": [
                    {"date": "2023-11-01", "steps": 2000},
                    {"date": "2023-10-01", "steps": 1000}
                ]
            }]
        }"#;
        let store = MemoryRecordStore::from_json(json).unwrap();
        let records = store.physical_records("zoe");
        assert_eq!(records[0].date.to_string(), "2023-10-01");
        assert_eq!(records[1].date.to_string(), "2023-11-01");
    }

    #[test]
    fn test_cohort_fetch_filters_by_bracket() {
        // Membership is half-open contains: alice (25) belongs to [25,36)
        // alongside john (30) and bob (35), even though her own age
        // resolves to [20,25).
        let store = MemoryRecordStore::from_dataset(Dataset::demo());
        let records = store.cohort_physical_records(AgeBracket::new(25, 36));
        let members: Vec<&str> = records.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(members, vec!["alice", "bob", "john"]);

        // Her resolved bracket has no members at all
        assert!(store
            .cohort_physical_records(AgeBracket::new(20, 25))
            .is_empty());
    }

    #[test]
    fn test_validate_clean_dataset() {
        assert!(validate_dataset(&Dataset::demo()).is_empty());
    }

    #[test]
    fn test_validate_flags_duplicates_and_bad_age() {
        let json = r#"{
            "users": [
                {"user_id": "dup", "name": "A", "age": 30},
                {"user_id": "dup", "name": "B", "age": -2,
                 "sleep": [
                    {"date": "2023-10-01", "sleep_hours": 8, "avg_heart_rate": 60, "avg_oxygen_level": 98},
                    {"date": "2023-10-01", "sleep_hours": 7, "avg_heart_rate": 62, "avg_oxygen_level": 97}
                 ]}
            ]
        }"#;
        let dataset = Dataset::from_json(json).unwrap();
        let issues = validate_dataset(&dataset);
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().any(|i| i.message == "Duplicate user id"));
        assert!(issues.iter().any(|i| i.domain == Some(Domain::Sleep)));
        assert!(issues.iter().any(|i| i.message.contains("negative")));
    }
}
