//! AI channel suggestions.
//!
//! A fixed set of mood channels is scored against what the viewer typed and
//! the time of day. There is no model behind this; it is keyword overlap.

use serde::Serialize;

/// Part of the day used for the time bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Maps an hour (0-23, wrapped) to its slot.
    pub fn from_hour(hour: u32) -> Self {
        match hour % 24 {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }
}

/// A static mood channel.
#[derive(Debug, Clone, Serialize)]
pub struct AiChannel {
    pub slug: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub keywords: &'static [&'static str],
    pub best_times: &'static [TimeOfDay],
}

use TimeOfDay::*;

pub static AI_CHANNELS: [AiChannel; 8] = [
    AiChannel {
        slug: "chill-vibes",
        name: "Chill Vibes",
        emoji: "🌊",
        description: "Lo-fi, ambient and slow sets to unwind to",
        keywords: &["chill", "relax", "lofi", "lo-fi", "calm", "ambient", "unwind", "mellow"],
        best_times: &[Evening, Night],
    },
    AiChannel {
        slug: "focus-flow",
        name: "Focus Flow",
        emoji: "🎯",
        description: "Background loops for deep work and study sessions",
        keywords: &["focus", "study", "work", "concentrate", "productivity", "coding", "deep work"],
        best_times: &[Morning, Afternoon],
    },
    AiChannel {
        slug: "morning-boost",
        name: "Morning Boost",
        emoji: "☀️",
        description: "Upbeat clips to start the day",
        keywords: &["morning", "energy", "wake", "upbeat", "coffee", "motivation", "happy"],
        best_times: &[Morning],
    },
    AiChannel {
        slug: "late-night",
        name: "Late Night",
        emoji: "🌙",
        description: "Moody, cinematic and after-hours picks",
        keywords: &["night", "late", "sleep", "moody", "dark", "insomnia", "cinematic"],
        best_times: &[Night],
    },
    AiChannel {
        slug: "laugh-track",
        name: "Laugh Track",
        emoji: "😂",
        description: "Sketches, stand-up and internet comedy",
        keywords: &["funny", "comedy", "laugh", "humor", "memes", "jokes", "sketch"],
        best_times: &[Afternoon, Evening],
    },
    AiChannel {
        slug: "nature-escape",
        name: "Nature Escape",
        emoji: "🌿",
        description: "Forests, oceans, wildlife and slow travel",
        keywords: &["nature", "ocean", "forest", "animals", "wildlife", "travel", "rain", "outdoors"],
        best_times: &[Morning, Evening],
    },
    AiChannel {
        slug: "workout-pump",
        name: "Workout Pump",
        emoji: "💪",
        description: "High-tempo sessions for training and running",
        keywords: &["workout", "gym", "fitness", "run", "training", "cardio", "hype", "pump"],
        best_times: &[Morning, Afternoon],
    },
    AiChannel {
        slug: "learn-something",
        name: "Learn Something",
        emoji: "🧠",
        description: "Explainers, science and bite-size documentaries",
        keywords: &["learn", "science", "history", "documentary", "explain", "education", "curious", "facts"],
        best_times: &[Afternoon, Evening],
    },
];

/// Points for the query naming the channel itself.
const NAME_MATCH: u32 = 3;
/// Points for a keyword appearing in the query.
const KEYWORD_MATCH: u32 = 2;
/// Points for a query word appearing inside a keyword.
const PARTIAL_MATCH: u32 = 1;
/// Flat bonus when the channel suits the current time of day.
const TIME_BONUS: u32 = 1;
/// Query words shorter than this never count as partial matches.
const MIN_PARTIAL_LEN: usize = 3;

/// A channel with its score for one query.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChannel {
    #[serde(flatten)]
    pub channel: &'static AiChannel,
    pub score: u32,
    pub time_match: bool,
}

/// Scores every AI channel against `query` at `hour` and returns them best
/// first. Ties keep table order.
pub fn suggest(query: &str, hour: u32) -> Vec<ScoredChannel> {
    let query = query.trim().to_lowercase();
    let words: Vec<&str> = query
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|w| !w.is_empty())
        .collect();
    let slot = TimeOfDay::from_hour(hour);

    let mut scored: Vec<ScoredChannel> = AI_CHANNELS
        .iter()
        .map(|channel| {
            let mut score = 0;

            if !query.is_empty()
                && (query.contains(&channel.name.to_lowercase())
                    || query.contains(&channel.slug.replace('-', " "))
                    || words.contains(&channel.slug))
            {
                score += NAME_MATCH;
            }

            for keyword in channel.keywords {
                if query.contains(keyword) {
                    score += KEYWORD_MATCH;
                } else if words
                    .iter()
                    .any(|w| w.len() >= MIN_PARTIAL_LEN && keyword.contains(w))
                {
                    score += PARTIAL_MATCH;
                }
            }

            let time_match = channel.best_times.contains(&slot);
            if time_match {
                score += TIME_BONUS;
            }

            ScoredChannel {
                channel,
                score,
                time_match,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Looks up an AI channel by slug.
pub fn find(slug: &str) -> Option<&'static AiChannel> {
    AI_CHANNELS.iter().find(|c| c.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_of_day_slots() {
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(16), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(20), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(21), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(29), TimeOfDay::Morning);
    }

    #[test]
    fn test_returns_every_channel_sorted() {
        let results = suggest("something to relax", 14);
        assert_eq!(results.len(), AI_CHANNELS.len());
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_keyword_beats_time_bonus() {
        // 8am favours morning channels, but the query is about comedy.
        let results = suggest("I need something funny", 8);
        assert_eq!(results[0].channel.slug, "laugh-track");
        assert!(!results[0].time_match);
    }

    #[test]
    fn test_empty_query_ranks_by_time_only() {
        let results = suggest("", 23);
        let top: Vec<_> = results
            .iter()
            .take_while(|r| r.score == TIME_BONUS)
            .map(|r| r.channel.slug)
            .collect();
        assert_eq!(top, vec!["chill-vibes", "late-night"]);
        assert!(results.iter().all(|r| r.score <= TIME_BONUS));
    }

    #[test]
    fn test_name_match_bonus() {
        let results = suggest("play focus flow please", 22);
        assert_eq!(results[0].channel.slug, "focus-flow");
        assert!(results[0].score >= NAME_MATCH + KEYWORD_MATCH);
    }

    #[test]
    fn test_partial_word_match() {
        // "doc" is inside "documentary" but no keyword is inside the query.
        let results = suggest("doc", 14);
        assert_eq!(results[0].channel.slug, "learn-something");
        assert_eq!(results[0].score, PARTIAL_MATCH + TIME_BONUS);
    }

    #[test]
    fn test_short_words_do_not_partially_match() {
        let results = suggest("a", 3);
        let learn = results
            .iter()
            .find(|r| r.channel.slug == "learn-something")
            .unwrap();
        assert_eq!(learn.score, 0);
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let upper = suggest("WORKOUT GYM", 12);
        let lower = suggest("workout gym", 12);
        assert_eq!(upper[0].channel.slug, lower[0].channel.slug);
        assert_eq!(upper[0].score, lower[0].score);
    }

    #[test]
    fn test_ties_keep_table_order() {
        let results = suggest("", 14);
        let afternoon: Vec<_> = results
            .iter()
            .filter(|r| r.time_match)
            .map(|r| r.channel.slug)
            .collect();
        assert_eq!(
            afternoon,
            vec!["focus-flow", "laugh-track", "workout-pump", "learn-something"]
        );
    }

    #[test]
    fn test_find() {
        assert_eq!(find("nature-escape").unwrap().name, "Nature Escape");
        assert!(find("unknown").is_none());
    }

    #[test]
    fn test_serializes_flat() {
        let json = serde_json::to_value(&suggest("rain", 7)[0]).unwrap();
        assert_eq!(json["slug"], "nature-escape");
        assert!(json["score"].as_u64().unwrap() >= 2);
    }
}
