//! Forbidden-concept catalog.
//!
//! Each concept is a list of term fragments compiled into a single
//! case-insensitive regex anchored on word boundaries:
//!
//! ```text
//! (?i)\b(?:term_1|term_2|...|term_n)\b
//! ```
//!
//! The anchors are what keep `gunnel` from matching `guns?` while still letting
//! `gun.`, `gun!` and `(gun)` through. Boundaries are Unicode-aware, so a term
//! glued to a letter in any script does not match.
//!
//! Unicode `\b` pushes the regex crate off its DFA onto slower engines as soon
//! as the text has non-ASCII characters. Each definition therefore also
//! carries an unanchored candidate regex; the anchored matcher only runs when
//! the candidate finds a term somewhere in the text.
//!
//! Letters split by spaces or zero-width characters are not handled here.
//! That evasion class is left to the semantic layer and human review.

use regex::Regex;

use crate::models::{CatalogError, ForbiddenPattern};

/// A compiled matcher for one forbidden concept.
#[derive(Debug, Clone)]
pub struct PatternDefinition {
    pattern: ForbiddenPattern,
    candidate: Regex,
    matcher: Regex,
}

impl PatternDefinition {
    /// Compiles a term list for `pattern`.
    pub fn compile(pattern: ForbiddenPattern, terms: &[&str]) -> Result<Self, CatalogError> {
        if terms.is_empty() {
            return Err(CatalogError::EmptyTerms(pattern));
        }
        let alternation = terms.join("|");
        let compile = |source: String| {
            Regex::new(&source).map_err(|source| CatalogError::Compile { pattern, source })
        };
        let candidate = compile(format!(r"(?i)(?:{})", alternation))?;
        let matcher = compile(format!(r"(?i)\b(?:{})\b", alternation))?;
        Ok(Self {
            pattern,
            candidate,
            matcher,
        })
    }

    /// The concept this definition detects.
    pub fn pattern(&self) -> ForbiddenPattern {
        self.pattern
    }

    /// Returns true if the concept occurs anywhere in `content`.
    #[inline]
    pub fn is_match(&self, content: &str) -> bool {
        self.candidate.is_match(content) && self.matcher.is_match(content)
    }

    /// The compiled regex source.
    pub fn source(&self) -> &str {
        self.matcher.as_str()
    }
}

/// The immutable, ordered set of forbidden-concept matchers.
///
/// Build it once at startup with [`PatternCatalog::standard`] and share it
/// behind an `Arc`. Nothing mutates it after construction, so any number of
/// threads can evaluate against it without locking.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    definitions: Vec<PatternDefinition>,
}

impl PatternCatalog {
    /// Compiles the standard twelve-concept catalog.
    pub fn standard() -> Result<Self, CatalogError> {
        let definitions = ForbiddenPattern::ALL
            .iter()
            .map(|&pattern| PatternDefinition::compile(pattern, standard_terms(pattern)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { definitions })
    }

    /// Definitions in catalog order.
    pub fn definitions(&self) -> &[PatternDefinition] {
        &self.definitions
    }

    /// Looks up the definition for a concept.
    pub fn get(&self, pattern: ForbiddenPattern) -> Option<&PatternDefinition> {
        self.definitions.iter().find(|d| d.pattern == pattern)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Term fragments per concept. Fragments are regex syntax; each must start
/// and end on a word character so the boundary anchors apply.
fn standard_terms(pattern: ForbiddenPattern) -> &'static [&'static str] {
    match pattern {
        ForbiddenPattern::Surveillance => &[
            r"surveil(?:lance|led|ling|s)?",
            r"spy(?:ing|ware)",
            r"spy\s+on",
            r"stalkerware",
            r"wiretap(?:s|ped|ping)?",
            r"facial\s+recognition",
            r"mass\s+monitoring",
        ],
        ForbiddenPattern::Weapons => &[
            r"guns?",
            r"gunfire",
            r"firearms?",
            r"weapon(?:s|ry|ize|ized|izing|ise|ised|ising)?",
            r"explosives?",
            r"bombs?",
            r"ammunition",
            r"assault\s+rifles?",
            r"grenades?",
        ],
        ForbiddenPattern::PoliticalManipulation => &[
            r"propaganda",
            r"voter\s+suppression",
            r"election\s+(?:rigging|fraud|interference)",
            r"rig(?:ged|ging)?\s+(?:the\s+)?elections?",
            r"astroturf(?:ing)?",
            r"disinformation\s+campaigns?",
        ],
        ForbiddenPattern::FinancialExploitation => &[
            r"ponzi(?:\s+schemes?)?",
            r"pyramid\s+schemes?",
            r"predatory\s+lending",
            r"loan\s+shark(?:s|ing)?",
            r"money\s+laundering",
            r"launder(?:ing|ed)?\s+money",
            r"scam(?:s|ming|med)?\s+(?:the\s+)?(?:elderly|seniors|retirees)",
        ],
        ForbiddenPattern::Discrimination => &[
            r"racial\s+profiling",
            r"discriminat(?:e|es|ed|ing)\s+against",
            r"segregat(?:e|ed|ing|ion)\s+(?:by|based\s+on)\s+(?:race|religion|ethnicity|gender|caste)",
            r"(?:deny|denying|refuse|refusing)\s+(?:service|housing|employment)\s+to\s+(?:minorities|immigrants|women|disabled\s+people)",
            r"whites?\s+only",
        ],
        ForbiddenPattern::PseudoScience => &[
            r"homeopath(?:y|ic)",
            r"anti-?vax(?:x)?(?:ers?)?",
            r"miracle\s+cures?",
            r"crystal\s+healing",
            r"chemtrails?",
            r"flat\s+earth(?:ers?)?",
        ],
        ForbiddenPattern::PrivacyViolation => &[
            r"dox(?:x)?(?:ing|ed|es)?",
            r"scrap(?:e|ing)\s+personal\s+data",
            r"personal\s+data\s+(?:harvesting|scraping)",
            r"sell(?:ing)?\s+(?:user|customer|personal)\s+data",
            r"leak(?:ed|ing)?\s+(?:private|personal)\s+(?:data|information|records)",
            r"track(?:ing)?\s+(?:users|people|individuals)\s+without\s+(?:their\s+)?consent",
        ],
        ForbiddenPattern::Deepfakes => &[
            r"deep\s?fake(?:s|d)?",
            r"face\s?swap(?:s|ped|ping)?",
            r"voice\s+clon(?:e|es|ed|ing)",
            r"synthetic\s+(?:video|audio)\s+of\s+(?:real\s+)?(?:people|politicians|celebrities)",
        ],
        ForbiddenPattern::SocialEngineering => &[
            r"phish(?:ing|ed|es)?",
            r"spear-?phish(?:ing)?",
            r"pretexting",
            r"credential\s+harvesting",
            r"steal(?:ing)?\s+(?:passwords|credentials|login\s+details)",
            r"impersonat(?:e|ing)\s+(?:a\s+)?(?:bank|tech\s+support|government\s+official|police\s+officer)s?",
        ],
        ForbiddenPattern::MarketManipulation => &[
            r"pump[\s-]+and[\s-]+dump",
            r"insider\s+trading",
            r"wash\s+trad(?:e|es|ing)",
            r"spoof(?:ing)?\s+(?:orders|bids|the\s+market)",
            r"corner(?:ing)?\s+the\s+market",
            r"price[\s-]+fixing",
        ],
        ForbiddenPattern::LaborExploitation => &[
            r"child\s+labou?r",
            r"forced\s+labou?r",
            r"sweatshops?",
            r"wage\s+theft",
            r"debt\s+bondage",
            r"human\s+trafficking",
        ],
        ForbiddenPattern::HateSpeech => &[
            r"hate\s+(?:speech|crimes?|groups?)",
            r"racial\s+slurs?",
            r"ethnic\s+(?:slurs?|cleansing)",
            r"white\s+supremac(?:y|ist|ists)",
            r"subhumans?",
        ],
    }
}
