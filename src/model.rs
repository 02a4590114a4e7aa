use crate::reminder::ReminderSettings;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifiant fort pour Staff
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StaffId(String);

impl StaffId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Membre du personnel pouvant être planifié.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub name: String,
    #[serde(default)]
    pub department: String,
    /// Nombre de gardes visé sur la période (0 = non renseigné).
    #[serde(default)]
    pub target_shifts: u32,
}

impl Staff {
    pub fn new<N: Into<String>, D: Into<String>>(name: N, department: D) -> Self {
        Self {
            id: StaffId::random(),
            name: name.into(),
            department: department.into(),
            target_shifts: 0,
        }
    }

    pub fn with_target(mut self, target_shifts: u32) -> Self {
        self.target_shifts = target_shifts;
        self
    }
}

/// Identifiant fort pour ShiftAssignment
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssignmentId(String);

impl AssignmentId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Une personne posée sur un créneau `(date, slot_index)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    pub id: AssignmentId,
    pub date: NaiveDate,
    pub slot_index: u32,
    pub staff_id: StaffId,
}

impl ShiftAssignment {
    pub fn new(date: NaiveDate, slot_index: u32, staff_id: StaffId) -> Self {
        Self {
            id: AssignmentId::random(),
            date,
            slot_index,
            staff_id,
        }
    }

    /// Clé composite du créneau occupé.
    pub fn slot(&self) -> (NaiveDate, u32) {
        (self.date, self.slot_index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HolidayId(String);

impl HolidayId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Jour férié : purement informatif, ne contraint pas le planning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub id: HolidayId,
    pub date: NaiveDate,
    pub name: String,
}

impl Holiday {
    pub fn new<N: Into<String>>(date: NaiveDate, name: N) -> Self {
        Self {
            id: HolidayId::random(),
            date,
            name: name.into(),
        }
    }
}

/// Réglages persistés avec le roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSettings {
    #[serde(default = "default_shifts_per_day")]
    pub shifts_per_day: u32,
    #[serde(default)]
    pub reminders: ReminderSettings,
}

fn default_shifts_per_day() -> u32 {
    3
}

impl Default for RosterSettings {
    fn default() -> Self {
        Self {
            shifts_per_day: default_shifts_per_day(),
            reminders: ReminderSettings::default(),
        }
    }
}

/// Roster complet
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Roster {
    #[serde(default)]
    pub staff: Vec<Staff>,
    #[serde(default)]
    pub assignments: Vec<ShiftAssignment>,
    #[serde(default)]
    pub holidays: Vec<Holiday>,
    #[serde(default)]
    pub settings: RosterSettings,
}

impl Roster {
    pub fn find_staff_by_id<'a>(&'a self, id: &StaffId) -> Option<&'a Staff> {
        self.staff.iter().find(|s| &s.id == id)
    }
    pub fn find_staff_by_name<'a>(&'a self, name: &str) -> Option<&'a Staff> {
        self.staff.iter().find(|s| s.name == name)
    }
    /// Résout un identifiant ou, à défaut, un nom exact.
    pub fn resolve_staff<'a>(&'a self, key: &str) -> Option<&'a Staff> {
        self.find_staff_by_id(&StaffId::new(key))
            .or_else(|| self.find_staff_by_name(key))
    }
    pub fn assignment_at(&self, date: NaiveDate, slot_index: u32) -> Option<&ShiftAssignment> {
        self.assignments
            .iter()
            .find(|a| a.date == date && a.slot_index == slot_index)
    }
    pub fn holiday_on(&self, date: NaiveDate) -> Option<&Holiday> {
        self.holidays.iter().find(|h| h.date == date)
    }

    /// Fusionne des affectations produites par l'auto-planification.
    pub fn merge(&mut self, new_assignments: Vec<ShiftAssignment>) {
        self.assignments.extend(new_assignments);
        self.assignments.sort_by_key(|a| (a.date, a.slot_index));
    }
}
