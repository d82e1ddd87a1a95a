use super::{ScoreComponent, ScoringFactor};
use crate::config::icp::contains_any;
use crate::config::IcpConfig;
use crate::workflows::leads::domain::present;
use crate::workflows::leads::EnrichedLead;

/// Industries credited in full even when they miss the configured list.
const TECH_ADJACENT_INDUSTRIES: [&str; 5] =
    ["tech", "software", "internet", "information", "services"];

/// Score all five factors in their fixed reporting order.
pub(crate) fn score_lead(lead: &EnrichedLead, config: &IcpConfig) -> [ScoreComponent; 5] {
    [
        score_industry(present(&lead.industry), config),
        score_company_size(lead.employee_count, config),
        score_title(present(&lead.contact_title), config),
        score_location(present(&lead.headquarters), config),
        score_technology(lead.technology_stack.as_deref(), config),
    ]
}

const fn half(weight: u32) -> u32 {
    weight / 2
}

fn component(factor: ScoringFactor, points: u32, note: String) -> ScoreComponent {
    ScoreComponent {
        factor,
        points,
        note,
    }
}

// Industry and title have no partial-credit path: missing data scores zero.
pub(crate) fn score_industry(industry: Option<&str>, config: &IcpConfig) -> ScoreComponent {
    let weight = config.scoring_weights.industry_match;
    let Some(industry) = industry else {
        return component(ScoringFactor::Industry, 0, "Industry unknown".to_string());
    };

    let lowered = industry.to_lowercase();
    let adjacent = TECH_ADJACENT_INDUSTRIES
        .iter()
        .any(|keyword| lowered.contains(keyword));

    if contains_any(industry, &config.industries) || adjacent {
        component(
            ScoringFactor::Industry,
            weight,
            format!("Industry match: {industry}"),
        )
    } else {
        component(
            ScoringFactor::Industry,
            0,
            format!("Industry mismatch: {industry}"),
        )
    }
}

/// Unknown and oversized headcounts both earn half the weight. Treat that as a
/// product policy gap, not as something to tidy up here.
pub(crate) fn score_company_size(
    employee_count: Option<u32>,
    config: &IcpConfig,
) -> ScoreComponent {
    let weight = config.scoring_weights.company_size_match;
    let Some(count) = employee_count else {
        return component(
            ScoringFactor::CompanySize,
            half(weight),
            "Employee count unavailable (partial credit)".to_string(),
        );
    };

    if (config.min_employees..=config.max_employees).contains(&count) {
        component(
            ScoringFactor::CompanySize,
            weight,
            format!("Size match: {count} employees"),
        )
    } else if count < config.min_employees {
        component(
            ScoringFactor::CompanySize,
            0,
            format!("Too small: {count} employees"),
        )
    } else {
        // Same half credit as an unknown count.
        component(
            ScoringFactor::CompanySize,
            half(weight),
            format!("Larger than ideal: {count} employees"),
        )
    }
}

pub(crate) fn score_title(title: Option<&str>, config: &IcpConfig) -> ScoreComponent {
    let weight = config.scoring_weights.title_match;
    match title {
        None => component(ScoringFactor::Title, 0, "Title unknown".to_string()),
        Some(title) if contains_any(title, &config.target_titles) => component(
            ScoringFactor::Title,
            weight,
            format!("Title match: {title}"),
        ),
        Some(title) => component(
            ScoringFactor::Title,
            0,
            format!("Title not in ICP: {title}"),
        ),
    }
}

pub(crate) fn score_location(headquarters: Option<&str>, config: &IcpConfig) -> ScoreComponent {
    let weight = config.scoring_weights.location_match;
    match headquarters {
        None => component(
            ScoringFactor::Location,
            half(weight),
            "Location unknown (partial credit)".to_string(),
        ),
        Some(hq) if contains_any(hq, &config.target_locations) => component(
            ScoringFactor::Location,
            weight,
            format!("Location match: {hq}"),
        ),
        // City-level headquarters rarely name the country.
        Some(hq) => component(
            ScoringFactor::Location,
            half(weight),
            format!("Location partial credit: {hq}"),
        ),
    }
}

pub(crate) fn score_technology(stack: Option<&[String]>, config: &IcpConfig) -> ScoreComponent {
    let weight = config.scoring_weights.technology_match;
    let stack = match stack {
        Some(stack) if !stack.is_empty() => stack,
        _ => {
            return component(
                ScoringFactor::Technology,
                half(weight),
                "Tech stack unavailable (partial credit)".to_string(),
            )
        }
    };

    let lowered: Vec<String> = stack.iter().map(|tech| tech.to_lowercase()).collect();
    let matched: Vec<&str> = config
        .technology_signals
        .iter()
        .filter(|signal| {
            let signal = signal.to_lowercase();
            lowered.iter().any(|tech| tech.contains(&signal))
        })
        .map(String::as_str)
        .collect();

    if matched.is_empty() {
        component(
            ScoringFactor::Technology,
            0,
            "No matching technology signals".to_string(),
        )
    } else {
        component(
            ScoringFactor::Technology,
            weight,
            format!("Tech signals: {}", matched.join(", ")),
        )
    }
}
