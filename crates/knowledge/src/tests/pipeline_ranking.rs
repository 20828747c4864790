//! Ranking scenarios over the full normalize, chunk, score, select chain.

use super::PAPER_TEXT;
use crate::chunker::{chunk_text, ChunkConfig, Chunker};
use crate::context::{ContextAssembler, SectionLabel};
use crate::normalize::normalize;
use crate::scoring::{RelevanceScorer, ScoringMode};
use crate::select::select_top_k;
use paperqa_core::AppError;

fn paper_chunker() -> Chunker {
    Chunker::new(ChunkConfig {
        chunk_size: 40,
        overlap: 5,
        boundary_fraction: 0.4,
        min_chunk_chars: 0,
        max_chunks: None,
    })
    .unwrap()
}

#[test]
fn test_paper_text_chunks_on_sentence_boundaries() {
    let chunks = paper_chunker().chunk(&normalize(PAPER_TEXT));

    let starts: Vec<usize> = chunks.iter().map(|c| c.start).collect();
    assert_eq!(starts, vec![0, 27, 55, 82, 106]);
    assert_eq!(chunks[0].text, "Abstract. This paper studies X.");
    assert_eq!(chunks[4].text, "ion. We conclude V.");
}

#[test]
fn test_keyword_ranking_prefers_dense_sections() {
    let chunks = paper_chunker().chunk(&normalize(PAPER_TEXT));
    let scored = RelevanceScorer::new(ScoringMode::research_keywords()).score_all(&chunks);

    // Chunk 1 holds "introduction" and "propose", chunk 2 "method" and "result".
    let top_two = select_top_k(scored.clone(), 2);
    assert_eq!(
        top_two.iter().map(|c| c.index).collect::<Vec<_>>(),
        vec![1, 2]
    );

    let top_four = select_top_k(scored.clone(), 4);
    assert_eq!(
        top_four.iter().map(|c| c.index).collect::<Vec<_>>(),
        vec![1, 2, 0, 3]
    );

    // The closing chunk has no keyword, only its length bonus.
    assert!((scored[4].score - 0.019).abs() < 1e-9);
}

#[test]
fn test_selected_context_uses_sequential_labels() {
    let chunks = paper_chunker().chunk(&normalize(PAPER_TEXT));
    let scored = RelevanceScorer::new(ScoringMode::research_keywords()).score_all(&chunks);
    let context = ContextAssembler::new(SectionLabel::Section).assemble(&select_top_k(scored, 2));

    assert_eq!(
        context,
        "Section 1:\ns X. Introduction. We propose Y.\n\nSection 2:\ne Y. Method. We use Z. Results."
    );
}

#[test]
fn test_question_ranking_discards_unrelated_chunks() {
    let text = "Background on the field. The methodology involves sampling survey data. \
                Results are reported. Unrelated closing remarks here.";
    let chunker = Chunker::new(ChunkConfig {
        chunk_size: 40,
        overlap: 5,
        boundary_fraction: 0.3,
        min_chunk_chars: 0,
        max_chunks: None,
    })
    .unwrap();
    let chunks = chunker.chunk(&normalize(text));

    let relevant: Vec<_> = RelevanceScorer::new(ScoringMode::question("What methodology was used?"))
        .score_all(&chunks)
        .into_iter()
        .filter(|s| s.score > 0.0)
        .collect();

    assert_eq!(relevant.len(), 1);
    assert!((relevant[0].score - 1.5).abs() < 1e-9);
    assert!(relevant[0].chunk.text.contains("methodology"));
}

#[test]
fn test_empty_text_yields_no_sections() {
    let chunks = paper_chunker().chunk(&normalize(" \n\t "));
    assert!(chunks.is_empty());

    let scored = RelevanceScorer::new(ScoringMode::research_keywords()).score_all(&chunks);
    assert!(scored.is_empty());
    assert!(select_top_k(scored, 4).is_empty());
    assert_eq!(ContextAssembler::new(SectionLabel::Section).assemble(&[]), "");
}

#[test]
fn test_overlap_equal_to_size_is_rejected_before_chunking() {
    let err = chunk_text(PAPER_TEXT, 50, 50).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
}
