use super::stats::NurseStats;
use crate::calendar::DayKind;
use crate::model::{Nurse, Shift, WorkCondition};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Quota d'OFF de la semaine en cours pour une infirmière qui y est soumise.
#[derive(Debug, Clone, Copy)]
pub struct WeeklyQuota {
    pub target: u32,
    pub count: u32,
}

/// Tout ce que voit la politique de classement pour une candidature
/// (infirmière, poste) un jour donné.
pub struct ScoreContext<'a> {
    pub nurse: &'a Nurse,
    pub shift: Shift,
    pub day_kind: DayKind,
    pub stats: &'a NurseStats,
    /// `None` pour la paire d'alternance, exemptée du quota hebdomadaire.
    pub weekly: Option<WeeklyQuota>,
    /// Moyenne des OFF de week-end sur tout le roster.
    pub avg_weekend_off_all: f64,
    /// Moyenne des OFF de week-end du groupe « journée uniquement ».
    pub avg_weekend_off_daytime: f64,
}

/// Politique de classement des candidatures du remplissage générique.
/// Interchangeable : la boucle jour par jour ne connaît que ce trait.
pub trait RankingPolicy {
    fn rank(&mut self, ctx: &ScoreContext<'_>) -> f64;
}

/// Politique par défaut : somme pondérée ajustée à la main, plus un léger
/// bruit aléatoire pour départager et varier les plannings d'un appel à
/// l'autre.
#[derive(Debug)]
pub struct WeightedPolicy {
    rng: StdRng,
}

impl WeightedPolicy {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl RankingPolicy for WeightedPolicy {
    fn rank(&mut self, ctx: &ScoreContext<'_>) -> f64 {
        let stats = ctx.stats;
        let daytime = ctx.nurse.work_condition == WorkCondition::DaytimeOnly;
        let weekend = ctx.day_kind == DayKind::WeekendHoliday;
        let mut score = 0.0;

        // 1. Quota d'OFF hebdomadaire (hors paire d'alternance).
        if let Some(weekly) = ctx.weekly {
            let diff = i64::from(weekly.count) - i64::from(weekly.target);
            if ctx.shift == Shift::Off {
                if diff < 0 {
                    score += diff.unsigned_abs() as f64 * 200.0;
                    if daytime {
                        score += diff.unsigned_abs() as f64 * 300.0;
                    }
                } else if diff >= i64::from(weekly.target) {
                    score -= 100.0;
                }
            } else if diff < 0 {
                score -= diff.unsigned_abs() as f64 * 100.0;
            }
        }

        // 2. Équilibre OFF week-end / semaine.
        if daytime {
            if weekend {
                score -= f64::from(stats.weekend_off_count) * 15.0;
                if f64::from(stats.weekend_off_count) < ctx.avg_weekend_off_all {
                    score += 10.0;
                }
            }
        } else if weekend {
            score -= f64::from(stats.weekend_off_count) * 8.0;
            score += f64::from(stats.weekday_off_count) * 5.0;
        } else {
            score -= f64::from(stats.weekday_off_count) * 8.0;
            score += f64::from(stats.weekend_off_count) * 5.0;
        }

        // 3. Anti-répétition du dernier poste.
        if stats.last_shift == Some(ctx.shift) {
            score -= 30.0;
            if stats.consecutive_same > 0 {
                score -= f64::from(stats.consecutive_same) * 20.0;
            }
        } else {
            score += 10.0;
        }

        // 4. Diversité des postes : pénalité au-delà de 50 % du même poste.
        let total = stats.total();
        if total > 0 {
            let ratio = f64::from(stats.count(ctx.shift)) / f64::from(total);
            if ratio > 0.5 {
                score -= (ratio - 0.5) * 50.0;
            }
        }

        // 5. Trois fois le même poste d'affilée.
        if let [a, b] = stats.last_two[..] {
            if a == b && a == ctx.shift {
                score -= 25.0;
            }
        }

        // 6. Bruit de départage.
        score += self.rng.gen_range(-2.5..=2.5);

        // 7. Équilibre DAY/MID-DAY du groupe journée en semaine.
        if daytime && !weekend {
            let day_count = stats.count(Shift::Day);
            let mid_count = stats.count(Shift::MidDay);
            if ctx.shift == Shift::Day && day_count > mid_count {
                score -= 5.0;
            } else if ctx.shift == Shift::MidDay && mid_count > day_count {
                score -= 5.0;
            } else {
                score += 5.0;
            }
        }

        // 8. Équité des OFF de week-end au sein du groupe journée.
        if daytime && weekend {
            let own = f64::from(stats.weekend_off_count);
            let avg = ctx.avg_weekend_off_daytime;
            if ctx.shift == Shift::Off {
                if own < avg {
                    score += 20.0;
                } else if own > avg {
                    score -= 20.0;
                }
            } else if own > avg {
                score += 15.0;
            }
        }

        score
    }
}
