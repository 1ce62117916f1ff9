// Domain rules - Option legality per operation and media kind

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::utils::TimeCodec;

/// Container formats accepted as conversion targets for video
pub const SUPPORTED_VIDEO_FORMATS: &[&str] =
    &["mp4", "mkv", "mov", "avi", "webm", "flv", "3gp", "ts", "mpeg"];

/// Container formats accepted as conversion targets for audio
pub const SUPPORTED_AUDIO_FORMATS: &[&str] =
    &["mp3", "aac", "m4a", "wav", "flac", "ogg", "opus", "wma"];

/// Formats a media kind can be converted to
pub fn supported_formats(kind: MediaKind) -> &'static [&'static str] {
    match kind {
        MediaKind::Audio => SUPPORTED_AUDIO_FORMATS,
        MediaKind::Video => SUPPORTED_VIDEO_FORMATS,
    }
}

/// Conversion options used when the caller gives none
pub fn default_convert_options(kind: MediaKind) -> OperationOptions {
    let extension = match kind {
        MediaKind::Audio => "mp3",
        MediaKind::Video => "mp4",
    };
    OperationOptions::new().with("extension", extension)
}

/// Expected primitive type of an option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Any string
    Text,
    /// String that parses as `HH:MM:SS[.mmm]`
    TimeString,
    /// String from the kind's supported formats
    Format,
}

/// Schema entry for one recognized option
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub name: &'static str,
    pub value_type: ValueType,
    pub required: bool,
}

const CUT_OPTIONS: &[OptionSpec] = &[
    OptionSpec {
        name: "from",
        value_type: ValueType::TimeString,
        required: true,
    },
    OptionSpec {
        name: "to",
        value_type: ValueType::TimeString,
        required: true,
    },
    OptionSpec {
        name: "outputFilePath",
        value_type: ValueType::Text,
        required: false,
    },
];

const CONVERT_TO_OPTIONS: &[OptionSpec] = &[
    OptionSpec {
        name: "extension",
        value_type: ValueType::Format,
        required: true,
    },
    OptionSpec {
        name: "outputFilePath",
        value_type: ValueType::Text,
        required: false,
    },
];

/// Closed set of options an operation recognizes
pub fn option_schema(operation: Operation) -> &'static [OptionSpec] {
    match operation {
        Operation::Cut => CUT_OPTIONS,
        Operation::ConvertTo => CONVERT_TO_OPTIONS,
    }
}

/// Validates caller options against an operation's schema
pub struct OptionValidator;

impl OptionValidator {
    /// Validate `options` for `operation` on a `kind` file.
    ///
    /// The first offending option fails the whole set. Unknown keys are
    /// reported before missing or mistyped ones.
    pub fn validate(
        options: &OperationOptions,
        operation: Operation,
        kind: MediaKind,
    ) -> CheckResult {
        match Self::check(options, operation, kind) {
            Ok(()) => CheckResult::passed(None),
            Err(e) => CheckResult::failed(e),
        }
    }

    fn check(options: &OperationOptions, operation: Operation, kind: MediaKind) -> MediaResult<()> {
        let schema = option_schema(operation);

        if let Some(unknown) = options
            .keys()
            .find(|key| !schema.iter().any(|spec| spec.name == *key))
        {
            let accepted: Vec<&str> = schema.iter().map(|spec| spec.name).collect();
            return Err(MediaError::options(
                unknown,
                format!(
                    "The option \"{}\" is not recognized by \"{}\". Accepted options: {}",
                    unknown,
                    operation,
                    accepted.join(", ")
                ),
            ));
        }

        for spec in schema {
            match options.get(spec.name) {
                None if spec.required => {
                    return Err(MediaError::options(
                        spec.name,
                        format!("The option \"{}\" is required by \"{}\"", spec.name, operation),
                    ));
                }
                None => {}
                Some(value) => Self::check_value(spec, value, kind)?,
            }
        }

        Ok(())
    }

    fn check_value(spec: &OptionSpec, value: &OptionValue, kind: MediaKind) -> MediaResult<()> {
        let text = value.as_text().ok_or_else(|| {
            MediaError::options(
                spec.name,
                format!(
                    "The option \"{}\" should be a string. {} given",
                    spec.name,
                    value.type_name()
                ),
            )
        })?;

        match spec.value_type {
            ValueType::Text => Ok(()),
            ValueType::TimeString => TimeCodec::to_milliseconds(text).map(|_| ()).map_err(|e| {
                MediaError::options(spec.name, format!("The option \"{}\": {}", spec.name, e))
            }),
            ValueType::Format => {
                let formats = supported_formats(kind);
                if formats.contains(&text.to_lowercase().as_str()) {
                    Ok(())
                } else {
                    Err(MediaError::options(
                        spec.name,
                        format!(
                            "The option \"{}\" should be one of [{}] for {} files. \"{}\" given",
                            spec.name,
                            formats.join(", "),
                            kind,
                            text
                        ),
                    ))
                }
            }
        }
    }
}
