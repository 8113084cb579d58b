// ABOUTME: Local rule-based air quality advisory engine behind the chatbot endpoint
// ABOUTME: Routes a free-text question by keyword and answers from a live ward snapshot

use crate::aqi::AqiLevel;

/// Wards above this AQI are treated as needing attention
pub const CRITICAL_AQI: f64 = 150.0;

/// Health guidance for one band of the six-band scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guideline {
    pub range: &'static str,
    pub advice: &'static str,
}

/// Government directive that applies once AQI exceeds `threshold`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GovernmentRule {
    pub threshold: f64,
    pub rule: &'static str,
}

pub const GOVERNMENT_RULES: [GovernmentRule; 4] = [
    GovernmentRule {
        threshold: 200.0,
        rule: "Construction activities banned when AQI exceeds 200.",
    },
    GovernmentRule {
        threshold: 300.0,
        rule: "Industries must halt operations (GRAP Stage III) when AQI exceeds 300.",
    },
    GovernmentRule {
        threshold: 350.0,
        rule: "Schools and colleges must close when AQI exceeds 350.",
    },
    GovernmentRule {
        threshold: 400.0,
        rule: "Odd-even vehicle scheme activated; emergency health advisory issued when AQI exceeds 400.",
    },
];

/// WHO-style guidance for the band containing `aqi`
pub fn guideline_for(aqi: f64) -> Guideline {
    match AqiLevel::from_aqi(aqi) {
        AqiLevel::Good => Guideline {
            range: "0-50",
            advice: "Air quality is satisfactory. No risk to general population.",
        },
        AqiLevel::Satisfactory => Guideline {
            range: "51-100",
            advice: "Minor breathing discomfort possible for sensitive people (children, elderly, respiratory patients).",
        },
        AqiLevel::ModeratelyPolluted => Guideline {
            range: "101-200",
            advice: "Breathing discomfort for people with lung disease, asthma, heart disease, children and older adults. Limit prolonged outdoor exertion.",
        },
        AqiLevel::Poor => Guideline {
            range: "201-300",
            advice: "Breathing discomfort likely for most people on prolonged exposure. Everyone should reduce outdoor activity.",
        },
        AqiLevel::VeryPoor => Guideline {
            range: "301-400",
            advice: "Respiratory illness on prolonged exposure. Serious effects on healthy people. Stay indoors, use air purifiers.",
        },
        AqiLevel::Severe => Guideline {
            range: "401-500",
            advice: "Health impacts even on healthy people. Serious impact on sensitive groups. Avoid all outdoor activity. Seek medical attention if symptoms occur.",
        },
    }
}

/// Rules triggered by an AQI value (strictly greater than the threshold)
pub fn triggered_rules(aqi: f64) -> Vec<&'static GovernmentRule> {
    GOVERNMENT_RULES
        .iter()
        .filter(|r| aqi > r.threshold)
        .collect()
}

fn elderly_advice(aqi: f64) -> &'static str {
    if aqi >= 300.0 {
        "Emergency level. Stay indoors strictly. Seek immediate medical attention if respiratory symptoms (coughing, shortness of breath) occur."
    } else if aqi >= 200.0 {
        "Stay indoors. Use air purifiers if available. Keep windows closed. Wear an N95 mask if going outside."
    } else if aqi >= 150.0 {
        "Avoid outdoor activity during peak hours (7-9 AM, 5-8 PM). Stay hydrated."
    } else {
        "Limit prolonged outdoor exertion. Take breaks during outdoor activities."
    }
}

/// Current reading for one ward
#[derive(Debug, Clone, PartialEq)]
pub struct WardSnapshot {
    pub name: String,
    pub aqi: f64,
    pub level: AqiLevel,
}

/// City-wide state the advisor answers from
#[derive(Debug, Clone, Default)]
pub struct CitySnapshot {
    pub wards: Vec<WardSnapshot>,
}

impl CitySnapshot {
    pub fn new(wards: Vec<WardSnapshot>) -> Self {
        Self { wards }
    }

    /// Rounded mean AQI across wards, or `None` when there are no wards
    pub fn average(&self) -> Option<f64> {
        if self.wards.is_empty() {
            return None;
        }
        let sum: f64 = self.wards.iter().map(|w| w.aqi).sum();
        Some((sum / self.wards.len() as f64).round())
    }

    pub fn max(&self) -> Option<f64> {
        self.wards.iter().map(|w| w.aqi).reduce(f64::max)
    }

    /// Wards sorted by AQI, worst first
    pub fn ranked(&self) -> Vec<&WardSnapshot> {
        let mut wards: Vec<&WardSnapshot> = self.wards.iter().collect();
        wards.sort_by(|a, b| b.aqi.total_cmp(&a.aqi));
        wards
    }

    pub fn critical(&self) -> Vec<&WardSnapshot> {
        self.ranked()
            .into_iter()
            .filter(|w| w.aqi > CRITICAL_AQI)
            .collect()
    }
}

/// What the question is about
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Status of one ward (index into the snapshot)
    Ward(usize),
    Health,
    Emergency,
    Summary,
    General,
}

/// Classify a question against the snapshot. A ward named in the question wins.
pub fn classify(message: &str, snapshot: &CitySnapshot) -> Intent {
    let query = message.to_lowercase();

    if let Some(idx) = snapshot
        .wards
        .iter()
        .position(|w| !w.name.is_empty() && query.contains(&w.name.to_lowercase()))
    {
        return Intent::Ward(idx);
    }

    if query.contains("why") && query.contains("critical") {
        if let Some(worst) = snapshot.ranked().first() {
            if let Some(idx) = snapshot.wards.iter().position(|w| w.name == worst.name) {
                return Intent::Ward(idx);
            }
        }
    }

    let any = |words: &[&str]| words.iter().any(|w| query.contains(w));

    if any(&["elderly", "old", "health", "should"]) {
        Intent::Health
    } else if any(&["emergency", "action", "which ward"]) {
        Intent::Emergency
    } else if any(&["summar", "overview", "current", "air quality"]) {
        Intent::Summary
    } else {
        Intent::General
    }
}

/// Compose a markdown answer. `fallback_aqi` is used when there are no wards.
pub fn respond(message: &str, snapshot: &CitySnapshot, fallback_aqi: Option<f64>) -> String {
    let avg = snapshot.average().or(fallback_aqi).unwrap_or(0.0);

    match classify(message, snapshot) {
        Intent::Ward(idx) => ward_status(&snapshot.wards[idx]),
        Intent::Health => health_advisory(avg),
        Intent::Emergency => emergency_assessment(snapshot, avg),
        Intent::Summary => city_summary(snapshot, avg),
        Intent::General => general_analysis(message, snapshot, avg),
    }
}

fn push_rules(out: &mut String, aqi: f64, heading: &str) {
    let rules = triggered_rules(aqi);
    if rules.is_empty() {
        return;
    }
    out.push_str(&format!("\n**{}:**\n", heading));
    for r in rules {
        out.push_str(&format!("- {}\n", r.rule));
    }
}

fn ward_status(ward: &WardSnapshot) -> String {
    let guideline = guideline_for(ward.aqi);
    let mut out = format!("**{}**: Current Status\n\n", ward.name);
    out.push_str(&format!("- AQI: **{}** ({})\n", ward.aqi, ward.level));
    out.push_str(&format!(
        "\n**WHO Advisory ({}):**\n{}\n",
        guideline.range, guideline.advice
    ));
    push_rules(&mut out, ward.aqi, "Government Actions Triggered");
    out
}

fn health_advisory(avg: f64) -> String {
    let mut out = String::from("**Health Advisory for Elderly & Sensitive Groups**\n\n");
    out.push_str(&format!(
        "Current City AQI: **{}** ({})\n\n",
        avg,
        AqiLevel::from_aqi(avg)
    ));
    out.push_str(&format!("**Recommended Actions:**\n{}\n\n", elderly_advice(avg)));
    out.push_str("**General Guidelines:**\n");
    out.push_str("- Keep prescribed medications (inhalers, nebulizers) readily accessible\n");
    out.push_str("- Monitor symptoms: persistent coughing, wheezing, shortness of breath\n");
    out.push_str("- Use N95/KN95 masks when outdoor exposure is unavoidable\n");
    out.push_str("- Keep indoor air clean: use air purifiers, avoid incense and candles\n");

    if avg > 200.0 {
        out.push_str(&format!(
            "\n**IMPORTANT:** At the current AQI of {}, elderly individuals and people with respiratory conditions should strictly avoid outdoor activity.\n",
            avg
        ));
    }
    out
}

fn emergency_assessment(snapshot: &CitySnapshot, avg: f64) -> String {
    let critical = snapshot.critical();
    if critical.is_empty() {
        return format!(
            "**No Emergency Action Required**\n\nAll {} wards are currently within acceptable AQI thresholds (at or below {}). The city average AQI is {} ({}).\n",
            snapshot.wards.len(),
            CRITICAL_AQI,
            avg,
            AqiLevel::from_aqi(avg)
        );
    }

    let mut out = String::from("**Emergency Action Assessment**\n\n");
    out.push_str(&format!(
        "**{} out of {} wards** require attention:\n\n",
        critical.len(),
        snapshot.wards.len()
    ));
    for w in &critical {
        out.push_str(&format!("**{}**: AQI {} ({})\n", w.name, w.aqi, w.level));
        for r in triggered_rules(w.aqi) {
            out.push_str(&format!("  -> {}\n", r.rule));
        }
    }

    let worst = critical[0].aqi;
    let guideline = guideline_for(worst);
    out.push_str(&format!(
        "\n**WHO Advisory for worst conditions ({}):**\n{}\n\n**Immediate Government Actions:**\n",
        guideline.range, guideline.advice
    ));
    if worst > 400.0 {
        out.push_str("- Activate emergency health advisory across all wards\n- Implement odd-even vehicle scheme\n");
    }
    if worst > 300.0 {
        out.push_str("- Halt industrial operations in affected wards (GRAP Stage III)\n- Close schools and colleges if AQI > 350\n");
    }
    if worst > 200.0 {
        out.push_str("- Ban construction activities in affected zones\n");
    }
    out.push_str("- Deploy water sprinklers on major roads\n- Issue public health notification via SMS/alerts\n");
    out
}

fn city_summary(snapshot: &CitySnapshot, avg: f64) -> String {
    let guideline = guideline_for(avg);
    let mut out = String::from("**City Air Quality Summary**\n\n");
    out.push_str(&format!(
        "- **City Average AQI:** {} ({})\n",
        avg,
        AqiLevel::from_aqi(avg)
    ));
    if let Some(max) = snapshot.max() {
        out.push_str(&format!("- **Maximum AQI:** {}\n", max));
    }
    out.push_str(&format!(
        "- **Critical Wards:** {}/{}\n\n",
        snapshot.critical().len(),
        snapshot.wards.len()
    ));

    let ranked = snapshot.ranked();
    if !ranked.is_empty() {
        out.push_str("**Ward Breakdown:**\n");
        for w in ranked {
            out.push_str(&format!("- {}: AQI {} ({})\n", w.name, w.aqi, w.level));
        }
    }

    out.push_str(&format!(
        "\n**WHO Assessment ({}):**\n{}\n",
        guideline.range, guideline.advice
    ));
    push_rules(
        &mut out,
        snapshot.max().unwrap_or(avg),
        "Active Government Directives",
    );

    let recommendation = if avg > 200.0 {
        "Limit outdoor exposure. Vulnerable groups should stay indoors."
    } else if avg > 100.0 {
        "Sensitive individuals should limit prolonged outdoor exertion."
    } else {
        "Air quality is acceptable for most activities."
    };
    out.push_str(&format!("\n**Recommendation:** {}\n", recommendation));
    out
}

fn general_analysis(message: &str, snapshot: &CitySnapshot, avg: f64) -> String {
    let guideline = guideline_for(avg);
    let ranked = snapshot.ranked();

    let mut out = String::from("**Air Quality Analysis**\n\n");
    out.push_str(&format!("Regarding your query: \"{}\"\n\n", message.trim()));
    out.push_str("**Current Conditions:**\n");
    out.push_str(&format!(
        "- City Average AQI: **{}** ({})\n",
        avg,
        AqiLevel::from_aqi(avg)
    ));
    if let (Some(worst), Some(best)) = (ranked.first(), ranked.last()) {
        out.push_str(&format!("- Highest AQI: {} at **{}**\n", worst.name, worst.aqi));
        out.push_str(&format!("- Lowest AQI: {} at **{}**\n", best.name, best.aqi));
    }
    out.push_str(&format!(
        "- Critical Wards: {}/{}\n\n",
        snapshot.critical().len(),
        snapshot.wards.len()
    ));
    out.push_str(&format!("**WHO Assessment:**\n{}\n", guideline.advice));
    if avg > CRITICAL_AQI {
        push_rules(&mut out, avg, "Active Government Directives");
    }
    out.push_str("\nFor specific information, try asking:\n- \"Which wards need emergency action?\"\n- \"What should elderly people do?\"\n- \"Summarize current air quality\"\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ward(name: &str, aqi: f64) -> WardSnapshot {
        WardSnapshot {
            name: name.to_string(),
            aqi,
            level: AqiLevel::from_aqi(aqi),
        }
    }

    fn snapshot() -> CitySnapshot {
        CitySnapshot::new(vec![
            ward("Central", 80.0),
            ward("Industrial Belt", 320.0),
            ward("Riverside", 160.0),
        ])
    }

    #[test]
    fn test_average_and_max() {
        let s = snapshot();
        assert_eq!(s.average(), Some(187.0));
        assert_eq!(s.max(), Some(320.0));
        assert_eq!(CitySnapshot::default().average(), None);
    }

    #[test]
    fn test_critical_wards_sorted_worst_first() {
        let s = snapshot();
        let names: Vec<&str> = s.critical().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Industrial Belt", "Riverside"]);
    }

    #[test]
    fn test_classify_ward_by_name() {
        let s = snapshot();
        assert_eq!(classify("How is riverside today?", &s), Intent::Ward(2));
    }

    #[test]
    fn test_classify_why_critical_picks_worst_ward() {
        let s = snapshot();
        assert_eq!(classify("Why is it so critical?", &s), Intent::Ward(1));
    }

    #[test]
    fn test_classify_keywords() {
        let s = snapshot();
        assert_eq!(classify("What should elderly people do?", &s), Intent::Health);
        assert_eq!(classify("Any emergency?", &s), Intent::Emergency);
        assert_eq!(classify("Give me an overview", &s), Intent::Summary);
        assert_eq!(classify("hello there", &s), Intent::General);
    }

    #[test]
    fn test_triggered_rules_are_strictly_greater() {
        assert!(triggered_rules(200.0).is_empty());
        assert_eq!(triggered_rules(201.0).len(), 1);
        assert_eq!(triggered_rules(351.0).len(), 3);
        assert_eq!(triggered_rules(450.0).len(), 4);
    }

    #[test]
    fn test_ward_response_mentions_rules() {
        let s = snapshot();
        let text = respond("industrial belt status", &s, None);
        assert!(text.contains("Industrial Belt"));
        assert!(text.contains("GRAP Stage III"));
        assert!(text.contains("301-400"));
    }

    #[test]
    fn test_emergency_without_critical_wards() {
        let s = CitySnapshot::new(vec![ward("Central", 40.0)]);
        let text = respond("which ward needs emergency action", &s, None);
        assert!(text.contains("No Emergency Action Required"));
    }

    #[test]
    fn test_fallback_aqi_used_without_wards() {
        let text = respond("what should I do", &CitySnapshot::default(), Some(250.0));
        assert!(text.contains("**250**"));
        assert!(text.contains("IMPORTANT"));
    }
}
