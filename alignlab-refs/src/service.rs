//!
//! Model-assisted alignment suggestions.
//!
//! The service builds a prompt from the student sample (and optionally a
//! labeled teacher sample), streams the answer of an [AlignmentProvider] and
//! parses the JSON object it contains. Nothing is applied to a labeling; the
//! caller decides what to do with the result.
//!

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AlignmentError;

pub const SYSTEM_PROMPT: &str = "You align tokens between a code comment and the code it documents. \
Identify the concepts in the comment tokens and match each one to the code tokens implementing it. \
Follow the example if one is given and answer in the requested JSON format.";

static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub comment_tokens: Vec<String>,
    pub code_tokens: Vec<String>,
}

///
/// One aligned concept: comment symbols and the code symbols matching them.
///
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alignment {
    pub comment_token: Vec<String>,
    pub code_token: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentResponse {
    pub alignments: Vec<Alignment>,
}

///
/// A worked example shown to the model before the student sample.
///
#[derive(Clone, Copy, Debug)]
pub struct TeacherExample<'a> {
    pub tokens: &'a TokenPair,
    pub alignments: &'a [Alignment],
}

#[derive(Clone, Copy, Debug)]
pub struct AlignmentRequest<'a> {
    pub student: &'a TokenPair,
    pub teacher: Option<TeacherExample<'a>>,
}

impl AlignmentRequest<'_> {
    fn teacher_prompt(teacher: &TeacherExample<'_>) -> Result<String, AlignmentError> {
        Ok(format!(
            "\nAn example of aligned comment and code tokens:\n\
             Comment tokens:\n{}\n\
             Code tokens:\n{}\n\
             Alignments:\n{}\n",
            serde_json::to_string(&teacher.tokens.comment_tokens)?,
            serde_json::to_string(&teacher.tokens.code_tokens)?,
            serde_json::to_string(teacher.alignments)?,
        ))
    }

    fn student_prompt(&self) -> Result<String, AlignmentError> {
        let format = AlignmentResponse {
            alignments: vec![Alignment {
                comment_token: vec!["token1".to_string(), "token2".to_string()],
                code_token: vec!["tokenA".to_string(), "tokenB".to_string()],
            }],
        };

        Ok(format!(
            "\nAlign the following tokens. Keep separate concepts in separate \
             alignments and use the tokens exactly as given.\n\
             Comment tokens:\n{}\n\
             Code tokens:\n{}\n\
             Answer with a JSON object like:\n{}\n",
            serde_json::to_string(&self.student.comment_tokens)?,
            serde_json::to_string(&self.student.code_tokens)?,
            serde_json::to_string_pretty(&format)?,
        ))
    }

    ///
    /// The full prompt: system instruction, the teacher example if any,
    /// then the student tokens.
    ///
    pub fn prompt(&self, system_prompt: &str) -> Result<String, AlignmentError> {
        let mut prompt = system_prompt.to_string();
        if let Some(teacher) = self.teacher.as_ref() {
            prompt.push_str(&Self::teacher_prompt(teacher)?);
        }
        prompt.push_str(&self.student_prompt()?);
        Ok(prompt)
    }
}

///
/// Something that answers a prompt as a stream of text chunks.
///
/// Chunks must be handed to `on_chunk` in the order they are received, and
/// all of them before `stream` returns.
///
pub trait AlignmentProvider {
    fn stream(&mut self, prompt: &str, on_chunk: &mut dyn FnMut(&str)) -> Result<(), AlignmentError>;
}

#[derive(Default)]
pub struct StreamCallbacks<'a> {
    on_data: Option<Box<dyn FnMut(&str) + 'a>>,
    on_error: Option<Box<dyn FnMut(&AlignmentError) + 'a>>,
    on_finish: Option<Box<dyn FnMut(&AlignmentResponse) + 'a>>,
}

impl<'a> StreamCallbacks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_data(mut self, f: impl FnMut(&str) + 'a) -> Self {
        self.on_data = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl FnMut(&AlignmentError) + 'a) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn on_finish(mut self, f: impl FnMut(&AlignmentResponse) + 'a) -> Self {
        self.on_finish = Some(Box::new(f));
        self
    }
}

///
/// Extract and parse the outermost `{...}` of a model answer.
///
pub fn parse_alignment_response(text: &str) -> Result<AlignmentResponse, AlignmentError> {
    let json = JSON_OBJECT.find(text).ok_or(AlignmentError::NoJson)?;
    Ok(serde_json::from_str(json.as_str())?)
}

pub struct TokenAlignmentService<P: AlignmentProvider> {
    provider: P,
    system_prompt: String,
}

impl<P: AlignmentProvider> TokenAlignmentService<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    ///
    /// Ask the provider for an alignment of the student tokens.
    ///
    /// Errors go to `on_error` when it is set, in which case `Ok(None)` is
    /// returned; otherwise they are returned.
    ///
    /// # Arguments:
    /// - student: unique symbols of the sample to align
    /// - teacher: an optional worked example
    /// - callbacks: streaming hooks
    ///
    pub fn generate_alignment(
        &mut self,
        student: &TokenPair,
        teacher: Option<TeacherExample<'_>>,
        mut callbacks: StreamCallbacks<'_>,
    ) -> Result<Option<AlignmentResponse>, AlignmentError> {
        let request = AlignmentRequest { student, teacher };

        let result = self.run(&request, &mut callbacks);
        match result {
            Ok(response) => {
                if let Some(on_finish) = callbacks.on_finish.as_mut() {
                    on_finish(&response);
                }
                Ok(Some(response))
            }
            Err(error) => match callbacks.on_error.as_mut() {
                Some(on_error) => {
                    on_error(&error);
                    Ok(None)
                }
                None => Err(error),
            },
        }
    }

    fn run(
        &mut self,
        request: &AlignmentRequest<'_>,
        callbacks: &mut StreamCallbacks<'_>,
    ) -> Result<AlignmentResponse, AlignmentError> {
        let prompt = request.prompt(&self.system_prompt)?;
        debug!("Requesting alignment, prompt of {} bytes", prompt.len());

        let mut full_response = String::new();
        self.provider.stream(&prompt, &mut |chunk| {
            full_response.push_str(chunk);
            if let Some(on_data) = callbacks.on_data.as_mut() {
                on_data(chunk);
            }
        })?;

        parse_alignment_response(&full_response)
    }
}

///
/// Replays a recorded answer chunk by chunk. Prompts it receives are kept.
///
#[derive(Clone, Debug, Default)]
pub struct ReplayProvider {
    chunks: Vec<String>,
    prompts: Vec<String>,
}

impl ReplayProvider {
    pub fn new(chunks: Vec<String>) -> Self {
        Self {
            chunks,
            prompts: vec![],
        }
    }

    ///
    /// Split a recorded answer into chunks of at most `chunk_size` characters.
    ///
    pub fn from_text(text: &str, chunk_size: usize) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let chunks = chars
            .chunks(chunk_size.max(1))
            .map(|chunk| chunk.iter().collect())
            .collect();
        ReplayProvider::new(chunks)
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl AlignmentProvider for ReplayProvider {
    fn stream(&mut self, prompt: &str, on_chunk: &mut dyn FnMut(&str)) -> Result<(), AlignmentError> {
        self.prompts.push(prompt.to_string());
        for chunk in self.chunks.iter() {
            on_chunk(chunk);
        }
        Ok(())
    }
}
