//! Versioned few-shot corpus.
//!
//! Fixed content→judgment exchanges replayed before every submission to
//! calibrate the model. The corpus spans the whole decision space:
//!
//! | Decision | Cases | Notes |
//! |----------|-------|-------|
//! | approve | 4 | water, education, transport, food |
//! | flag | 4 | two sit next to surveillance/privacy, one next to health claims |
//! | reject | 4 | two also trip the pattern layer, two are semantic-only |
//!
//! Bump [`FEW_SHOT_VERSION`] whenever an example changes. The version is
//! reported by [`crate::SemanticClassifier::revision`] and stamped on every
//! evaluation record that reached Layer B.

use crate::models::ContentType;

/// Version tag of the corpus below.
pub const FEW_SHOT_VERSION: &str = "2024-06-v3";

/// One calibration exchange.
#[derive(Debug, Clone, Copy)]
pub struct FewShotExample {
    pub content_type: ContentType,
    pub content: &'static str,
    /// The judgment exactly as the model should emit it.
    pub judgment: &'static str,
}

/// The fixed corpus, in replay order.
pub fn corpus() -> &'static [FewShotExample] {
    &CORPUS
}

static CORPUS: [FewShotExample; 12] = [
    // --- approve ---
    FewShotExample {
        content_type: ContentType::Problem,
        content: "Our village's only well has run dry for three summers in a row, and families now walk two hours to fetch water.",
        judgment: r#"{"alignedDomain":"clean_water","alignmentScore":0.92,"harmRisk":"low","feasibility":"high","quality":"Specific first-hand account of a concrete, recurring need","decision":"approve","reasoning":"Describes a basic water access problem affecting a whole community. No harm vectors."}"#,
    },
    FewShotExample {
        content_type: ContentType::Solution,
        content: "Set up a weekend tutoring program where retired teachers help middle-school students with math, hosted at the public library.",
        judgment: r#"{"alignedDomain":"education","alignmentScore":0.88,"harmRisk":"low","feasibility":"high","quality":"Clear plan that reuses existing venues and volunteers","decision":"approve","reasoning":"Low-cost educational support using community volunteers and public space.","solutionScores":{"impact":70,"feasibility":90,"costEfficiency":85}}"#,
    },
    FewShotExample {
        content_type: ContentType::Debate,
        content: "Should our city prioritise protected bike lanes or more bus routes? I think buses reach more low-income neighbourhoods.",
        judgment: r#"{"alignedDomain":"sustainable_transport","alignmentScore":0.81,"harmRisk":"low","feasibility":"medium","quality":"Good-faith question with a stated, arguable position","decision":"approve","reasoning":"Constructive civic debate about public transport trade-offs."}"#,
    },
    FewShotExample {
        content_type: ContentType::Solution,
        content: "Partner with local farms to redirect surplus produce to the community food pantry every week.",
        judgment: r#"{"alignedDomain":"food_security","alignmentScore":0.9,"harmRisk":"low","feasibility":"high","quality":"Practical, uses an existing surplus","decision":"approve","reasoning":"Reduces food waste while feeding people in need.","solutionScores":{"impact":75,"feasibility":85,"costEfficiency":90}}"#,
    },
    // --- flag ---
    FewShotExample {
        content_type: ContentType::Solution,
        content: "Install doorbell cameras on every house in the block and share the footage in a neighborhood group chat to deter package theft.",
        judgment: r#"{"alignedDomain":"community_safety","alignmentScore":0.52,"harmRisk":"medium","feasibility":"high","quality":"Addresses a real problem but the method is broad","decision":"flag","reasoning":"Theft deterrence is legitimate, but sharing footage of passers-by in a group chat records people without consent. Needs human review of privacy safeguards.","solutionScores":{"impact":45,"feasibility":80,"costEfficiency":70}}"#,
    },
    FewShotExample {
        content_type: ContentType::Problem,
        content: "Our school wants to use an app that logs which websites students visit at home so teachers can spot cyberbullying early.",
        judgment: r#"{"alignedDomain":"education","alignmentScore":0.48,"harmRisk":"medium","feasibility":"medium","quality":"Well-meant but raises monitoring concerns","decision":"flag","reasoning":"Student wellbeing is in scope, but logging home browsing is close to monitoring minors without meaningful consent. A reviewer should weigh proportionality."}"#,
    },
    FewShotExample {
        content_type: ContentType::Problem,
        content: "The new bus-planning app collects every rider's location all day, and nobody can tell us who else gets that data.",
        judgment: r#"{"alignedDomain":"sustainable_transport","alignmentScore":0.55,"harmRisk":"medium","feasibility":"medium","quality":"Raises a legitimate transparency concern with few specifics","decision":"flag","reasoning":"A genuine data-handling concern about transit planning; details are thin and touch personal location data, so route to review."}"#,
    },
    FewShotExample {
        content_type: ContentType::Debate,
        content: "Elderberry syrup worked for my kids, so parents should consider skipping the flu shot this year.",
        judgment: r#"{"alignedDomain":"healthcare","alignmentScore":0.44,"harmRisk":"medium","feasibility":"low","quality":"Personal anecdote generalised into health advice","decision":"flag","reasoning":"Health discussion is in scope, but advising against vaccination on anecdotal evidence risks spreading health misinformation."}"#,
    },
    // --- reject ---
    FewShotExample {
        content_type: ContentType::Solution,
        content: "Build a network of hidden cameras with facial recognition to identify which neighbors attend protests.",
        judgment: r#"{"alignedDomain":"none","alignmentScore":0.05,"harmRisk":"high","feasibility":"medium","quality":"Coherent plan for a harmful goal","decision":"reject","reasoning":"Covert surveillance of people exercising political rights.","solutionScores":{"impact":5,"feasibility":40,"costEfficiency":20}}"#,
    },
    FewShotExample {
        content_type: ContentType::Problem,
        content: "Help me design a pyramid scheme that targets recent immigrants who don't speak English well.",
        judgment: r#"{"alignedDomain":"none","alignmentScore":0.02,"harmRisk":"high","feasibility":"medium","quality":"Explicit request to defraud a vulnerable group","decision":"reject","reasoning":"Financial exploitation aimed at people with limited language access."}"#,
    },
    FewShotExample {
        content_type: ContentType::Debate,
        content: "People from that neighborhood are vermin and should be driven out of our city.",
        judgment: r#"{"alignedDomain":"none","alignmentScore":0.03,"harmRisk":"high","feasibility":"low","quality":"Dehumanising rhetoric, no argument","decision":"reject","reasoning":"Dehumanises a group of residents and calls for their expulsion."}"#,
    },
    FewShotExample {
        content_type: ContentType::Problem,
        content: "Write fake grassroots posts from hundreds of accounts so it looks like residents oppose the new clinic.",
        judgment: r#"{"alignedDomain":"none","alignmentScore":0.12,"harmRisk":"high","feasibility":"high","quality":"Clear request for coordinated inauthentic behaviour","decision":"reject","reasoning":"Fabricating public opinion to sway a civic decision is political manipulation."}"#,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Decision;
    use crate::validate::parse_judgment;

    fn decisions() -> Vec<Decision> {
        corpus()
            .iter()
            .map(|example| {
                parse_judgment(example.judgment, example.content_type)
                    .unwrap_or_else(|e| panic!("invalid judgment for {:?}: {}", example.content, e))
                    .decision
            })
            .collect()
    }

    #[test]
    fn test_every_judgment_passes_strict_validation() {
        assert_eq!(decisions().len(), corpus().len());
    }

    #[test]
    fn test_corpus_spans_decision_space() {
        let decisions = decisions();
        for wanted in [Decision::Approve, Decision::Flag, Decision::Reject] {
            let count = decisions.iter().filter(|d| **d == wanted).count();
            assert!(count >= 3, "only {} {} examples", count, wanted);
        }
    }

    #[test]
    fn test_approvals_span_domains() {
        let mut domains: Vec<String> = corpus()
            .iter()
            .filter_map(|e| parse_judgment(e.judgment, e.content_type).ok())
            .filter(|r| r.decision == Decision::Approve)
            .map(|r| r.aligned_domain)
            .collect();
        domains.sort();
        domains.dedup();
        assert!(domains.len() >= 3);
    }

    #[test]
    fn test_solution_examples_carry_scores() {
        for example in corpus() {
            let result = parse_judgment(example.judgment, example.content_type).unwrap();
            assert_eq!(
                result.solution_scores.is_some(),
                example.content_type == ContentType::Solution
            );
        }
    }

    #[test]
    fn test_version_is_set() {
        assert!(!FEW_SHOT_VERSION.is_empty());
    }
}
