use topicsum::{
    ArticleInput, GibbsConfig, KlSumOptions, LengthUnit, OptimizationStrategy, SummarizeOptions,
    Summarizer, SummarizerError, SummaryLength, TopicSumOptions,
};

fn article(id: &str, sentences: &[&str]) -> ArticleInput {
    let body: String = sentences
        .iter()
        .map(|s| {
            let tokens: String = s
                .split_whitespace()
                .map(|t| format!("<token pos=\"NN\">{t}</token>"))
                .collect();
            format!("<sentence><plainText>{s}</plainText><tokens>{tokens}</tokens></sentence>")
        })
        .collect();
    ArticleInput {
        content: format!(
            "<article id=\"{id}\"><title>T</title><body><item><text><p>{body}</p></text></item></body></article>"
        ),
        scores: vec![],
    }
}

#[test]
fn direct_mode_with_large_limit_returns_every_sentence() {
    let mut summarizer = Summarizer::new();
    let articles = vec![article(
        "a1",
        &[
            "the cat sat on the mat",
            "the dog barked loudly outside the house",
            "a bird flew over the garden fence",
        ],
    )];
    let (summary, _) = summarizer
        .summarize_direct(
            &articles,
            KlSumOptions::default(),
            SummarizeOptions {
                length: SummaryLength {
                    unit: LengthUnit::Token,
                    length: 10_000,
                },
                generate_debug: false,
            },
        )
        .unwrap();
    assert_eq!(summary.sentence_count(), 3);
}

#[test]
fn character_length_unit_is_rejected_through_the_facade() {
    let mut summarizer = Summarizer::new();
    let articles = vec![article("a1", &["the cat sat on the mat today"])];
    let result = summarizer.summarize_direct(
        &articles,
        KlSumOptions::default(),
        SummarizeOptions {
            length: SummaryLength {
                unit: LengthUnit::Character,
                length: 50,
            },
            generate_debug: false,
        },
    );
    assert!(matches!(result, Err(SummarizerError::Configuration(_))));
    assert!(summarizer.last_error().unwrap().contains("CHARACTER"));
}

#[test]
fn sentence_ranking_mode_emits_non_decreasing_scores() {
    let mut summarizer = Summarizer::new();
    let articles = vec![article(
        "a1",
        &[
            "the stock market rallied sharply this afternoon",
            "traders cited strong earnings across several sectors",
            "analysts expect continued growth into next quarter",
            "a separate report noted rising consumer confidence",
        ],
    )];
    let options = KlSumOptions {
        optimization_strategy: OptimizationStrategy::SentenceRanking,
        ..KlSumOptions::default()
    };
    let (summary, _) = summarizer
        .summarize_direct(
            &articles,
            options,
            SummarizeOptions {
                length: SummaryLength {
                    unit: LengthUnit::Sentence,
                    length: 4,
                },
                generate_debug: false,
            },
        )
        .unwrap();
    let scores: Vec<f64> = summary.sentences().iter().map(|s| s.score().unwrap()).collect();
    for pair in scores.windows(2) {
        assert!(pair[0] <= pair[1] + 1e-9);
    }
}

#[test]
fn topicsum_mode_produces_a_bounded_summary_with_debug_trace() {
    let mut summarizer = Summarizer::new();
    let articles = vec![article(
        "a1",
        &[
            "apple iphone ipad launch event",
            "apple reported record quarterly profits",
            "apple ipad sales grew this year",
        ],
    )];
    let topicsum_options = TopicSumOptions::from_triples(
        "0.1,0.1,0.1",
        "2,3,0",
        GibbsConfig {
            iterations: 30,
            burnin: 5,
            lag: 1,
            track_likelihood: false,
        },
    )
    .unwrap();
    let (summary, debug) = summarizer
        .summarize_topicsum(
            &articles,
            topicsum_options,
            KlSumOptions::default(),
            SummarizeOptions {
                length: SummaryLength {
                    unit: LengthUnit::Sentence,
                    length: 2,
                },
                generate_debug: true,
            },
            0,
            None,
        )
        .unwrap();
    assert_eq!(summary.sentence_count(), 2);
    assert!(debug.unwrap().contains("collection distribution"));
}

#[test]
fn article_score_count_must_match_sentence_count() {
    let mut summarizer = Summarizer::new();
    let mut bad_article = article("a1", &["one sentence here for testing"]);
    bad_article.scores = vec![0.1, 0.2];
    let result = summarizer.summarize_direct(
        &[bad_article],
        KlSumOptions::default(),
        SummarizeOptions {
            length: SummaryLength {
                unit: LengthUnit::Sentence,
                length: 1,
            },
            generate_debug: false,
        },
    );
    assert!(matches!(result, Err(SummarizerError::Input(_))));
}
