//! Вычисление занятости booth по списку назначений
//!
//! - an active assignment covering `now` makes the booth occupied (the most recently
//!   started one wins when several overlap);
//! - otherwise the earliest future active assignment makes it reserved;
//! - otherwise the booth is vacant.
//!
//! Cancelled assignments and assignments whose dates do not parse are ignored.
//! A date-only end date is inclusive: the assignment lasts through that whole day.

use super::aggregate::{AssignmentStatus, Booth, BoothAssignment};
use crate::shared::row::{CellValue, Row};
use crate::shared::time_window::parse_instant_str;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Occupancy {
    Vacant,
    Occupied {
        professional_id: String,
        professional_name: String,
        until: Option<String>,
    },
    Reserved {
        professional_id: String,
        professional_name: String,
        from: String,
    },
}

impl Occupancy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Occupancy::Vacant => "vacant",
            Occupancy::Occupied { .. } => "occupied",
            Occupancy::Reserved { .. } => "reserved",
        }
    }

    pub fn professional_name(&self) -> Option<&str> {
        match self {
            Occupancy::Vacant => None,
            Occupancy::Occupied {
                professional_name, ..
            }
            | Occupancy::Reserved {
                professional_name, ..
            } => Some(professional_name.as_str()),
        }
    }
}

/// Booth с вычисленной занятостью (строка списка booths)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoothOccupancy {
    pub booth: Booth,
    pub occupancy: Occupancy,
}

impl Row for BoothOccupancy {
    fn field(&self, path: &str) -> Option<CellValue> {
        match path {
            "occupancy" => Some(CellValue::from(self.occupancy.as_str())),
            "professional_name" => Some(CellValue::from(
                self.occupancy.professional_name().map(str::to_string),
            )),
            _ => self
                .booth
                .field(path.strip_prefix("booth.").unwrap_or(path)),
        }
    }

    fn row_key(&self) -> Option<String> {
        Some(self.booth.id.clone())
    }
}

// Exclusive upper bound; `YYYY-MM-DD` ends at the following midnight
fn parse_end_instant(raw: &str) -> Option<DateTime<Utc>> {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(day) => Some(day.and_hms_opt(0, 0, 0)?.and_utc() + Duration::days(1)),
        Err(_) => parse_instant_str(raw).map(|end| end + Duration::nanoseconds(1)),
    }
}

/// Occupancy of `booth_id` at `now`
pub fn occupancy(booth_id: &str, assignments: &[BoothAssignment], now: DateTime<Utc>) -> Occupancy {
    let candidates = assignments.iter().filter_map(|a| {
        if a.booth_id != booth_id || a.status == AssignmentStatus::Cancelled {
            return None;
        }
        let start = parse_instant_str(&a.start_date)?;
        let end = match &a.end_date {
            Some(raw) => Some(parse_end_instant(raw)?),
            None => None,
        };
        Some((a, start, end))
    });

    let mut current: Option<(&BoothAssignment, DateTime<Utc>)> = None;
    let mut next: Option<(&BoothAssignment, DateTime<Utc>)> = None;
    for (assignment, start, end) in candidates {
        if start <= now && end.map_or(true, |end| now < end) {
            if current.map_or(true, |(_, s)| start > s) {
                current = Some((assignment, start));
            }
        } else if start > now && next.map_or(true, |(_, s)| start < s) {
            next = Some((assignment, start));
        }
    }

    if let Some((a, _)) = current {
        return Occupancy::Occupied {
            professional_id: a.professional_id.clone(),
            professional_name: a.professional_name.clone(),
            until: a.end_date.clone(),
        };
    }
    if let Some((a, _)) = next {
        return Occupancy::Reserved {
            professional_id: a.professional_id.clone(),
            professional_name: a.professional_name.clone(),
            from: a.start_date.clone(),
        };
    }
    Occupancy::Vacant
}

/// Occupancy for every booth, in booth order
pub fn occupancy_table(
    booths: &[Booth],
    assignments: &[BoothAssignment],
    now: DateTime<Utc>,
) -> Vec<BoothOccupancy> {
    booths
        .iter()
        .map(|booth| BoothOccupancy {
            occupancy: occupancy(&booth.id, assignments, now),
            booth: booth.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn assignment(
        id: &str,
        booth: &str,
        start: &str,
        end: Option<&str>,
        status: AssignmentStatus,
    ) -> BoothAssignment {
        BoothAssignment {
            id: id.into(),
            booth_id: booth.into(),
            professional_id: format!("p-{}", id),
            professional_name: format!("Pro {}", id),
            start_date: start.into(),
            end_date: end.map(Into::into),
            status,
        }
    }

    #[test]
    fn test_vacant_without_assignments() {
        assert_eq!(occupancy("b1", &[], now()), Occupancy::Vacant);
    }

    #[test]
    fn test_open_ended_assignment_occupies() {
        let list = vec![assignment("1", "b1", "2024-03-01", None, AssignmentStatus::Active)];
        let occ = occupancy("b1", &list, now());
        assert_eq!(occ.as_str(), "occupied");
        assert_eq!(occ.professional_name(), Some("Pro 1"));
        assert_eq!(occupancy("b2", &list, now()), Occupancy::Vacant);
    }

    #[test]
    fn test_cancelled_and_expired_are_ignored() {
        let list = vec![
            assignment("1", "b1", "2024-03-01", None, AssignmentStatus::Cancelled),
            assignment("2", "b1", "2024-01-01", Some("2024-02-01"), AssignmentStatus::Active),
            assignment("3", "b1", "garbage", None, AssignmentStatus::Active),
        ];
        assert_eq!(occupancy("b1", &list, now()), Occupancy::Vacant);
    }

    #[test]
    fn test_date_only_end_covers_last_day() {
        let list = vec![assignment(
            "1",
            "b1",
            "2024-03-01",
            Some("2024-03-15"),
            AssignmentStatus::Active,
        )];
        assert_eq!(occupancy("b1", &list, now()).as_str(), "occupied");
        let late = Utc.with_ymd_and_hms(2024, 3, 15, 23, 59, 59).unwrap();
        assert_eq!(occupancy("b1", &list, late).as_str(), "occupied");
        let next_day = Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 0).unwrap();
        assert_eq!(occupancy("b1", &list, next_day), Occupancy::Vacant);
    }

    #[test]
    fn test_timestamp_end_is_inclusive_instant() {
        let list = vec![assignment(
            "1",
            "b1",
            "2024-03-01",
            Some("2024-03-15T12:00:00Z"),
            AssignmentStatus::Active,
        )];
        assert_eq!(occupancy("b1", &list, now()).as_str(), "occupied");
        let after = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 1).unwrap();
        assert_eq!(occupancy("b1", &list, after), Occupancy::Vacant);
    }

    #[test]
    fn test_future_assignment_reserves_earliest() {
        let list = vec![
            assignment("late", "b1", "2024-05-01", None, AssignmentStatus::Active),
            assignment("soon", "b1", "2024-04-01", None, AssignmentStatus::Active),
        ];
        match occupancy("b1", &list, now()) {
            Occupancy::Reserved { from, professional_id, .. } => {
                assert_eq!(from, "2024-04-01");
                assert_eq!(professional_id, "p-soon");
            }
            other => panic!("unexpected occupancy: {:?}", other),
        }
    }

    #[test]
    fn test_latest_started_overlap_wins() {
        let list = vec![
            assignment("old", "b1", "2024-01-01", None, AssignmentStatus::Active),
            assignment("new", "b1", "2024-03-10", Some("2024-03-31"), AssignmentStatus::Active),
        ];
        let table = occupancy_table(
            &[Booth {
                id: "b1".into(),
                name: "Booth 1".into(),
                location: "Westlands".into(),
                daily_rate: 1500.0,
            }],
            &list,
            now(),
        );
        assert_eq!(table[0].field("professional_name"), Some(CellValue::from("Pro new")));
        assert_eq!(table[0].field("booth.name"), Some(CellValue::from("Booth 1")));
        assert_eq!(table[0].field("occupancy"), Some(CellValue::from("occupied")));
    }
}
