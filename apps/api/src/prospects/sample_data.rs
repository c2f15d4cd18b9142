//! Synthetic prospects for demos and testing.
//!
//! Names, companies, positions, and locations follow fixed formulas; tags,
//! status, notes, and the profile URL suffix come from the supplied RNG.

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::{Builder, Uuid};

use crate::prospects::models::{ProspectRecord, ProspectStatus};

pub const SAMPLE_SIZE: usize = 20;

const COMPANIES: [&str; 12] = [
    "TechNova Solutions",
    "GlobalVista Marketing",
    "Quantum Dynamics",
    "Stellar Systems",
    "Emerald Innovations",
    "Horizon Analytics",
    "Pulse Enterprises",
    "Velocity Partners",
    "Axiom Technologies",
    "Zenith Corp",
    "Sapphire Software",
    "Pinnacle Solutions",
];

const POSITIONS: [&str; 12] = [
    "Chief Executive Officer",
    "Chief Technology Officer",
    "VP of Sales",
    "VP of Marketing",
    "Director of Operations",
    "Marketing Manager",
    "Sales Director",
    "Product Manager",
    "Head of Business Development",
    "Customer Success Manager",
    "IT Director",
    "Financial Controller",
];

const LOCATIONS: [&str; 10] = [
    "San Francisco, CA",
    "New York, NY",
    "Boston, MA",
    "Austin, TX",
    "Seattle, WA",
    "Chicago, IL",
    "Denver, CO",
    "Los Angeles, CA",
    "Miami, FL",
    "Atlanta, GA",
];

const TAG_OPTIONS: [&str; 12] = [
    "enterprise",
    "startup",
    "decision-maker",
    "influencer",
    "technical",
    "business",
    "finance",
    "marketing",
    "sales",
    "high-priority",
    "qualified",
    "new-contact",
];

const CONFERENCES: [&str; 5] = ["SaaS", "Tech", "Marketing", "Sales", "Finance"];
const MONTHS: [&str; 5] = ["January", "March", "June", "September", "November"];

/// Builds `SAMPLE_SIZE` prospects owned by `user_id`. Deterministic for a seeded `rng`.
pub fn generate_sample_prospects<R: Rng + ?Sized>(
    rng: &mut R,
    user_id: &str,
    now_ms: i64,
) -> Vec<ProspectRecord> {
    (0..SAMPLE_SIZE)
        .map(|i| sample_prospect(rng, i, user_id, now_ms))
        .collect()
}

fn sample_prospect<R: Rng + ?Sized>(
    rng: &mut R,
    i: usize,
    user_id: &str,
    now_ms: i64,
) -> ProspectRecord {
    let first_name = format!("First{}", i + 1);
    let last_name = format!("Last{}", i + 1);
    let company = COMPANIES[i % COMPANIES.len()];
    let company_slug: String = company.to_lowercase().replace(' ', "");

    let tag_count = rng.gen_range(1..=3);
    let tags = TAG_OPTIONS
        .choose_multiple(rng, tag_count)
        .map(|t| t.to_string())
        .collect();

    let profile_suffix: u16 = rng.gen_range(1000..=9999);
    let conference = CONFERENCES.choose(rng).copied().unwrap_or("Tech");
    let month = MONTHS.choose(rng).copied().unwrap_or("January");
    let status = ProspectStatus::ALL
        .choose(rng)
        .copied()
        .unwrap_or_default();

    ProspectRecord {
        id: random_uuid(rng),
        user_id: user_id.to_string(),
        email: format!(
            "{}.{}@{company_slug}.com",
            first_name.to_lowercase(),
            last_name.to_lowercase()
        ),
        linked_in_url: Some(format!(
            "https://linkedin.com/in/{}-{}-{profile_suffix}",
            first_name.to_lowercase(),
            last_name.to_lowercase()
        )),
        notes: Some(format!("Met at the {conference} conference in {month}")),
        first_name,
        last_name,
        company: company.to_string(),
        position: POSITIONS[i % POSITIONS.len()].to_string(),
        location: Some(LOCATIONS[i % LOCATIONS.len()].to_string()),
        tags,
        status,
        created_at: now_ms,
        updated_at: now_ms,
    }
}

/// A v4 UUID drawn from `rng`, so seeded runs reproduce ids too.
fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    Builder::from_random_bytes(bytes).into_uuid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prospects::importer::is_valid_email;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const NOW: i64 = 1_718_000_000_000;

    fn seeded(seed: u64) -> Vec<ProspectRecord> {
        let mut rng = StdRng::seed_from_u64(seed);
        generate_sample_prospects(&mut rng, "user-1", NOW)
    }

    #[test]
    fn test_generates_exactly_twenty() {
        assert_eq!(seeded(7).len(), 20);
    }

    #[test]
    fn test_emails_valid_and_formulaic() {
        let prospects = seeded(7);
        assert!(prospects.iter().all(|p| is_valid_email(&p.email)));
        assert_eq!(prospects[0].email, "first1.last1@technovasolutions.com");
        assert_eq!(prospects[12].email, "first13.last13@technovasolutions.com");
        assert_eq!(prospects[9].email, "first10.last10@zenithcorp.com");
    }

    #[test]
    fn test_fields_cycle_through_fixed_lists() {
        let prospects = seeded(1);
        assert_eq!(prospects[0].company, "TechNova Solutions");
        assert_eq!(prospects[11].position, "Financial Controller");
        assert_eq!(prospects[10].location.as_deref(), Some("San Francisco, CA"));
        assert_eq!(prospects[19].first_name, "First20");
    }

    #[test]
    fn test_random_parts_within_bounds() {
        for p in seeded(42) {
            assert!((1..=3).contains(&p.tags.len()));
            let mut unique = p.tags.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), p.tags.len());
            assert!(p.tags.iter().all(|t| TAG_OPTIONS.contains(&t.as_str())));
            assert!(ProspectStatus::ALL.contains(&p.status));

            let url = p.linked_in_url.unwrap();
            let suffix: u16 = url.rsplit('-').next().unwrap().parse().unwrap();
            assert!((1000..=9999).contains(&suffix));
            assert!(p.notes.unwrap().starts_with("Met at the "));
            assert_eq!(p.user_id, "user-1");
            assert_eq!(p.created_at, NOW);
        }
    }

    #[test]
    fn test_same_seed_same_output() {
        assert_eq!(seeded(99), seeded(99));
    }

    #[test]
    fn test_ids_are_unique_v4() {
        let prospects = seeded(3);
        let mut ids: Vec<_> = prospects.iter().map(|p| p.id).collect();
        assert!(ids.iter().all(|id| id.get_version_num() == 4));
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), SAMPLE_SIZE);
    }
}
