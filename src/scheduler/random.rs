use crate::model::AssignmentId;
use rand::rngs::ThreadRng;
use rand::Rng;
use uuid::Builder;

/// Amplitude (exclusive) du bruit de départage des égalités.
pub const JITTER_SPAN: f64 = 5.0;

/// Seule source d'aléa de la planification : bruit de départage et identifiants.
pub trait RandomSource {
    /// Valeur dans `[0, JITTER_SPAN)`.
    fn jitter(&mut self) -> f64;

    fn next_id(&mut self) -> AssignmentId {
        AssignmentId::random()
    }
}

/// Adaptateur pour n'importe quel générateur `rand` (graine fixe en test).
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<ThreadRng> {
    pub fn thread() -> Self {
        Self::new(rand::rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn jitter(&mut self) -> f64 {
        self.rng.random_range(0.0..JITTER_SPAN)
    }

    fn next_id(&mut self) -> AssignmentId {
        let bytes: [u8; 16] = self.rng.random();
        AssignmentId::new(Builder::from_random_bytes(bytes).into_uuid().to_string())
    }
}

/// Aucun bruit ; identifiants séquentiels `auto-1`, `auto-2`, ...
#[derive(Debug, Clone, Default)]
pub struct NoJitter {
    issued: u64,
}

impl RandomSource for NoJitter {
    fn jitter(&mut self) -> f64 {
        0.0
    }

    fn next_id(&mut self) -> AssignmentId {
        self.issued += 1;
        AssignmentId::new(format!("auto-{}", self.issued))
    }
}

/// Séquence de bruit imposée, rejouée en boucle.
#[derive(Debug, Clone)]
pub struct ScriptedJitter {
    values: Vec<f64>,
    cursor: usize,
    issued: u64,
}

impl ScriptedJitter {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            cursor: 0,
            issued: 0,
        }
    }
}

impl RandomSource for ScriptedJitter {
    fn jitter(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }

    fn next_id(&mut self) -> AssignmentId {
        self.issued += 1;
        AssignmentId::new(format!("auto-{}", self.issued))
    }
}
