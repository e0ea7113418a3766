//! Piece-release scheduling: size ordering, response curve, jitter.
use bevy::prelude::*;
use rand::Rng;

/// Order in which pieces of a group come loose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOrder {
    Random,
    BigFirst,
    SmallFirst,
}

impl ReleaseOrder {
    pub fn label(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::BigFirst => "big_first",
            Self::SmallFirst => "small_first",
        }
    }

    /// Parses a config keyword; `None` for anything unrecognised.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "random" => Some(Self::Random),
            "big_first" => Some(Self::BigFirst),
            "small_first" => Some(Self::SmallFirst),
            _ => None,
        }
    }
}

/// Sample-able response curve mapping normalized rank to normalized delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseCurve {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
}

impl ReleaseCurve {
    pub fn label(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease_in",
            Self::EaseOut => "ease_out",
        }
    }

    /// Parses a config keyword; `None` for anything unrecognised.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "linear" => Some(Self::Linear),
            "ease_in" => Some(Self::EaseIn),
            "ease_out" => Some(Self::EaseOut),
            _ => None,
        }
    }

    pub fn sample(self, rank: f32) -> f32 {
        let r = rank.clamp(0.0, 1.0);
        match self {
            Self::Linear => r,
            Self::EaseIn => r * r,
            Self::EaseOut => 1.0 - (1.0 - r) * (1.0 - r),
        }
    }
}

/// Computes one release delay per piece, indexed like `sizes`.
///
/// Pieces are ranked ascending by size; `BigFirst` reverses that ranking and
/// `Random` discards it for a uniform shuffle. The piece at rank `i` of `N`
/// gets `curve(i / (N - 1)) * total_duration` (rank 0 when `N == 1`), plus a
/// uniform jitter in `[-jitter, +jitter]`, clamped back into
/// `[0, total_duration]`.
pub fn release_delays<R: Rng>(
    sizes: &[f32],
    total_duration: f32,
    curve: ReleaseCurve,
    order: ReleaseOrder,
    jitter: f32,
    rng: &mut R,
) -> Vec<f32> {
    let count = sizes.len();
    if count == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<usize> = (0..count).collect();
    ranked.sort_by(|&a, &b| {
        sizes[a]
            .partial_cmp(&sizes[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    match order {
        ReleaseOrder::SmallFirst => {}
        ReleaseOrder::BigFirst => ranked.reverse(),
        ReleaseOrder::Random => {
            // Fisher-Yates, overriding the size ordering entirely
            for i in (1..count).rev() {
                let j = rng.gen_range(0..=i);
                ranked.swap(i, j);
            }
        }
    }

    let jitter = jitter.max(0.0);
    let mut delays = vec![0.0; count];
    for (rank, &piece) in ranked.iter().enumerate() {
        let normalized = if count == 1 {
            0.0
        } else {
            rank as f32 / (count - 1) as f32
        };
        let mut delay = curve.sample(normalized) * total_duration;
        if jitter > 0.0 {
            delay += rng.gen_range(-jitter..=jitter);
        }
        delays[piece] = delay.clamp(0.0, total_duration);
    }
    delays
}

/// Draws an independent despawn lifetime for one piece.
pub fn draw_piece_lifetime<R: Rng>(min: f32, max: f32, rng: &mut R) -> f32 {
    let low = min.max(0.0);
    let high = max.max(low);
    if high > low {
        rng.gen_range(low..=high)
    } else {
        low
    }
}

/// Random unit direction biased upward, for the detach ejection impulse.
pub fn eject_direction<R: Rng>(up_bias: f32, rng: &mut R) -> Vec3 {
    let mut dir = random_on_sphere(rng);
    dir.y = dir.y.abs() + up_bias;
    dir.normalize_or_zero()
}

fn random_on_sphere<R: Rng>(rng: &mut R) -> Vec3 {
    let y: f32 = rng.gen_range(-1.0..=1.0);
    let theta: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
    let ring = (1.0 - y * y).max(0.0).sqrt();
    Vec3::new(ring * theta.cos(), y, ring * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn small_first_spans_full_duration_in_size_order() {
        // deliberately unsorted sizes
        let sizes = [3.0, 1.0, 5.0, 2.0, 4.0];
        let delays = release_delays(
            &sizes,
            2.0,
            ReleaseCurve::Linear,
            ReleaseOrder::SmallFirst,
            0.0,
            &mut rng(),
        );

        // sort piece indices by size and check their delays are non-decreasing
        let mut by_size: Vec<usize> = (0..sizes.len()).collect();
        by_size.sort_by(|&a, &b| sizes[a].partial_cmp(&sizes[b]).unwrap());
        let ordered: Vec<f32> = by_size.iter().map(|&i| delays[i]).collect();
        for pair in ordered.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        assert_eq!(ordered[0], 0.0);
        assert_eq!(ordered[4], 2.0);
    }

    #[test]
    fn big_first_releases_largest_at_zero() {
        let sizes = [1.0, 9.0, 4.0];
        let delays = release_delays(
            &sizes,
            1.5,
            ReleaseCurve::Linear,
            ReleaseOrder::BigFirst,
            0.0,
            &mut rng(),
        );
        assert_eq!(delays[1], 0.0);
        assert_eq!(delays[0], 1.5);
    }

    #[test]
    fn single_piece_releases_immediately_for_any_curve() {
        for curve in [
            ReleaseCurve::Linear,
            ReleaseCurve::EaseIn,
            ReleaseCurve::EaseOut,
        ] {
            let delays = release_delays(
                &[2.5],
                3.0,
                curve,
                ReleaseOrder::SmallFirst,
                0.0,
                &mut rng(),
            );
            assert_eq!(delays, vec![0.0]);
        }
    }

    #[test]
    fn jitter_keeps_delays_within_total_duration() {
        let sizes: Vec<f32> = (1..=20).map(|i| i as f32).collect();
        let delays = release_delays(
            &sizes,
            1.0,
            ReleaseCurve::Linear,
            ReleaseOrder::SmallFirst,
            0.4,
            &mut rng(),
        );
        for delay in delays {
            assert!((0.0..=1.0).contains(&delay));
        }
    }

    #[test]
    fn random_order_still_assigns_every_piece_one_delay() {
        let sizes = [1.0, 2.0, 3.0, 4.0];
        let delays = release_delays(
            &sizes,
            2.0,
            ReleaseCurve::Linear,
            ReleaseOrder::Random,
            0.0,
            &mut rng(),
        );
        assert_eq!(delays.len(), 4);
        // rank delays 0, 1/3, 2/3, 1 scaled by 2.0 must all be present
        let mut sorted = delays.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for (expected, actual) in [0.0f32, 2.0 / 3.0, 4.0 / 3.0, 2.0].iter().zip(&sorted) {
            assert!((expected - actual).abs() < 1e-5);
        }
    }

    #[test]
    fn lifetimes_stay_inside_configured_band() {
        let mut rng = rng();
        for _ in 0..64 {
            let life = draw_piece_lifetime(2.0, 4.0, &mut rng);
            assert!((2.0..=4.0).contains(&life));
        }
        assert_eq!(draw_piece_lifetime(3.0, 3.0, &mut rng), 3.0);
        // inverted band collapses to the lower bound
        assert_eq!(draw_piece_lifetime(5.0, 1.0, &mut rng), 5.0);
    }

    #[test]
    fn eject_direction_is_upward_unit_vector() {
        let mut rng = rng();
        for _ in 0..32 {
            let dir = eject_direction(0.2, &mut rng);
            assert!((dir.length() - 1.0).abs() < 1e-4);
            assert!(dir.y > 0.0);
        }
    }

    #[test]
    fn order_keywords_round_trip() {
        for order in [
            ReleaseOrder::Random,
            ReleaseOrder::BigFirst,
            ReleaseOrder::SmallFirst,
        ] {
            assert_eq!(ReleaseOrder::parse(order.label()), Some(order));
        }
        assert_eq!(ReleaseOrder::parse("sideways"), None);
    }

    #[test]
    fn curve_keywords_round_trip_and_ease_bends_the_right_way() {
        for curve in [
            ReleaseCurve::Linear,
            ReleaseCurve::EaseIn,
            ReleaseCurve::EaseOut,
        ] {
            assert_eq!(ReleaseCurve::parse(curve.label()), Some(curve));
        }
        assert_eq!(ReleaseCurve::parse("bounce"), None);

        assert!(ReleaseCurve::EaseIn.sample(0.5) < 0.5);
        assert!(ReleaseCurve::EaseOut.sample(0.5) > 0.5);
        assert_eq!(ReleaseCurve::Linear.sample(0.5), 0.5);
    }
}
