use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::{debug, warn};

use alignlab_core::models::{Group, LabelingRecord, SampleIndex, indices_to_match};
use alignlab_core::utils::{read_to_string_dynamic, write_dynamic};
use alignlab_core::{AnnotatorConfig, Corpus};
use alignlab_labeling::LabelingEngine;
use alignlab_refs::{
    Alignment, AlignmentError, ReplayProvider, StreamCallbacks, TeacherExample,
    TokenAlignmentService, TokenPair, UniqueSymbols, to_alignment_with_indices,
    to_alignment_with_unique_tokens, to_unique_symbols_with_marker,
};

use crate::common::{
    labeling_path, load_config, load_corpus, load_engine, load_policy, load_reconcile_config, required,
};
use crate::teachers::handlers::load_teachers;

fn symbols_of(
    corpus: &Corpus,
    sample: SampleIndex,
    marker: char,
) -> Result<(UniqueSymbols, UniqueSymbols)> {
    let comment = corpus
        .tokens(sample, Group::Comment)
        .with_context(|| format!("Sample {} is not in the corpus", sample))?;
    let code = corpus
        .tokens(sample, Group::Code)
        .with_context(|| format!("Sample {} is not in the corpus", sample))?;
    Ok((
        to_unique_symbols_with_marker(comment, Group::Comment, marker),
        to_unique_symbols_with_marker(code, Group::Code, marker),
    ))
}

fn token_pair(comment: &UniqueSymbols, code: &UniqueSymbols) -> TokenPair {
    TokenPair {
        comment_tokens: comment.symbols.clone(),
        code_tokens: code.symbols.clone(),
    }
}

///
/// The first teacher of a sample, in unique symbols, with its labeling.
///
fn teacher_example(
    matches: &ArgMatches,
    config: &AnnotatorConfig,
    corpus: &Corpus,
    engine: &LabelingEngine,
    sample: SampleIndex,
    marker: char,
) -> Result<Option<(TokenPair, Vec<Alignment>)>> {
    if matches.get_flag("no-teacher") {
        return Ok(None);
    }
    let teachers = match load_teachers(matches, config) {
        Ok(teachers) => teachers,
        Err(e) => {
            warn!("No teachers available, prompting without an example: {:#}", e);
            return Ok(None);
        }
    };
    let Some(teacher) = teachers.teacher_indices(sample).first().copied() else {
        warn!("Sample {} has no teacher, prompting without an example", sample);
        return Ok(None);
    };

    let (comment, code) = symbols_of(corpus, teacher, marker)?;
    let labeling = engine
        .get_labeling_on_sample(teacher)
        .map(|labeling| labeling.to_expanded())
        .unwrap_or_default();
    if labeling.is_empty() {
        warn!("Teacher {} has an empty alignment", teacher);
    }
    let alignments = to_alignment_with_unique_tokens(&comment, &code, &labeling);

    Ok(Some((token_pair(&comment, &code), alignments)))
}

pub fn run_suggest(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let corpus = load_corpus(&config)?;
    let path = labeling_path(matches, &config);
    let mut engine = load_engine(&path, load_policy(matches))?;

    let sample = *required::<SampleIndex>(matches, "sample")?;
    let response_path = required::<String>(matches, "response")?;
    let chunk_size = *required::<usize>(matches, "chunk-size")?;

    let marker = load_reconcile_config(matches)?.subword_marker;
    let (comment, code) = symbols_of(&corpus, sample, marker)?;
    let student = token_pair(&comment, &code);
    let teacher = teacher_example(matches, &config, &corpus, &engine, sample, marker)?;

    let recorded = read_to_string_dynamic(Path::new(response_path))?;
    let mut service = TokenAlignmentService::new(ReplayProvider::from_text(&recorded, chunk_size));

    let mut received = 0;
    let response = service.generate_alignment(
        &student,
        teacher.as_ref().map(|(tokens, alignments)| TeacherExample {
            tokens,
            alignments: alignments.as_slice(),
        }),
        StreamCallbacks::new().on_data(|chunk| received += chunk.len()),
    );
    debug!("Received {} bytes of model output", received);

    let response = match response {
        Ok(Some(response)) => response,
        Ok(None) => return Err(AlignmentError::NoJson.into()),
        Err(e) => return Err(e).context("The recorded answer is not a valid alignment"),
    };

    let mut stdout = io::stdout().lock();
    if matches.get_flag("print-prompt") {
        for prompt in service.provider().prompts() {
            writeln!(stdout, "{}", prompt)?;
        }
    }

    let indices = to_alignment_with_indices(&response.alignments, &comment, &code);
    let record = LabelingRecord::new(sample, indices_to_match(&indices));
    writeln!(stdout, "{}", record.to_json_line()?)?;
    stdout.flush()?;

    if matches.get_flag("apply") {
        engine.set_raw_index_labeling_on_sample(sample, &indices);
        write_dynamic(&path, &format!("{}\n", engine.dump()?))?;
    }

    Ok(())
}
