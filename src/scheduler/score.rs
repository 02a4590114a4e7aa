//! Fonction de score de la passe gloutonne.
//!
//! Les poids sont choisis pour que le déficit de quota domine, puis l'espacement,
//! puis l'équilibrage ; le bruit ne sert qu'à départager les égalités.

/// Score d'un candidat exclu (jour déjà pris sans double affectation possible).
pub const REJECTED: f64 = -1_000_000.0;
/// Tout score au-dessus de ce seuil est admissible.
pub const FEASIBILITY_FLOOR: f64 = -100_000.0;
/// Écart utilisé quand la personne n'a jamais travaillé.
pub const NO_HISTORY_DAYS: i64 = 30;

const QUOTA_WEIGHT: f64 = 100.0;
const SPACING_CAP_DAYS: i64 = 7;
const SPACING_WEIGHT: f64 = 10.0;
const BALANCE_WEIGHT: f64 = 5.0;
const BACK_TO_BACK_PENALTY: f64 = 5_000.0;
const DOUBLE_BOOKING_PENALTY: f64 = 5_000.0;

#[derive(Debug, Clone, Copy)]
pub(super) struct Candidate {
    pub(super) target: u32,
    pub(super) assigned: u32,
    pub(super) days_since_last: i64,
    pub(super) working_today: bool,
}

/// Score hors bruit ; `None` pour un rejet dur.
pub(super) fn base_score(candidate: &Candidate, allow_double_booking: bool) -> Option<f64> {
    if candidate.working_today && !allow_double_booking {
        return None;
    }
    if candidate.days_since_last <= 0 {
        return None;
    }

    let deficit = i64::from(candidate.target) - i64::from(candidate.assigned);
    let quota = deficit as f64 * QUOTA_WEIGHT;
    let spacing = candidate.days_since_last.min(SPACING_CAP_DAYS) as f64 * SPACING_WEIGHT;
    let balance = -(f64::from(candidate.assigned) * BALANCE_WEIGHT);

    let mut score = quota + spacing + balance;
    if candidate.days_since_last == 1 {
        score -= BACK_TO_BACK_PENALTY;
    }
    if candidate.working_today {
        score -= DOUBLE_BOOKING_PENALTY;
    }
    Some(score)
}
