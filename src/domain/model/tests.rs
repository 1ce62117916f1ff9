// Unit tests for domain models

#[cfg(test)]
mod tests {
    use crate::domain::errors::*;
    use crate::domain::model::*;

    fn sample_video_details() -> MediaDetails {
        MediaDetails::Video(VideoDetails {
            duration_ms: 10_000,
            size_bytes: 15_804_433,
            extension: "mp4".to_string(),
            format_name: Some("mov,mp4,m4a,3gp,3g2,mj2".to_string()),
            bit_rate: Some(1_200_000),
            width: 640,
            height: 360,
        })
    }

    #[test]
    fn test_media_kind_parse() {
        assert_eq!("video".parse::<MediaKind>().unwrap(), MediaKind::Video);
        assert_eq!("AUDIO".parse::<MediaKind>().unwrap(), MediaKind::Audio);
        assert!("image".parse::<MediaKind>().is_err());
    }

    #[test]
    fn test_handle_derives_extension() {
        let handle = MediaHandle::new("/media/in.MP4", MediaKind::Video);
        assert_eq!(handle.extension(), Some("mp4"));
        assert!(handle.check_input().is_correct());
    }

    #[test]
    fn test_handle_without_extension_fails_input_check() {
        let handle = MediaHandle::new("/media/in", MediaKind::Video);
        assert_eq!(handle.extension(), None);

        let check = handle.check_input();
        assert!(!check.is_correct());
        assert_eq!(check.message(), INCORRECT_INPUT_PATH);
        assert_eq!(check.error().map(MediaError::kind), Some(ErrorKind::InputPath));
    }

    #[test]
    fn test_set_full_path_invalidates_cache() {
        let mut handle = MediaHandle::new("in.mp4", MediaKind::Video);
        handle.store_details(sample_video_details());
        assert!(handle.cached_details().is_some());

        handle.set_full_path("other.mkv");
        assert!(handle.cached_details().is_none());
        assert_eq!(handle.extension(), Some("mkv"));
        assert_eq!(handle.full_path(), "other.mkv");
    }

    #[test]
    fn test_media_details_accessors() {
        let details = sample_video_details();
        assert_eq!(details.kind(), MediaKind::Video);
        assert_eq!(details.duration_ms(), 10_000);
        assert_eq!(details.size_bytes(), 15_804_433);
        assert_eq!(details.extension(), "mp4");
        assert_eq!(details.dimensions(), Some((640, 360)));

        let audio = MediaDetails::Audio(AudioDetails {
            duration_ms: 1_000,
            size_bytes: 10,
            extension: "mp3".to_string(),
            format_name: None,
            bit_rate: None,
        });
        assert_eq!(audio.dimensions(), None);
    }

    #[test]
    fn test_media_details_serialize_tagged() {
        let json = serde_json::to_value(sample_video_details()).unwrap();
        assert_eq!(json["kind"], "video");
        assert_eq!(json["width"], 640);
    }

    #[test]
    fn test_options_from_json() {
        let options = OperationOptions::from_json(
            r#"{"from":"00:00:02.000","to":"00:00:05.000","n":3,"b":true}"#,
        )
        .unwrap();
        assert_eq!(options.get_text("from"), Some("00:00:02.000"));
        assert_eq!(options.get("n"), Some(&OptionValue::Integer(3)));
        assert_eq!(options.get("b"), Some(&OptionValue::Boolean(true)));
    }

    #[test]
    fn test_options_from_json_rejects_non_object() {
        let err = OperationOptions::from_json("[1, 2]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Options);
    }

    #[test]
    fn test_option_value_type_names() {
        assert_eq!(OptionValue::from("x").type_name(), "string");
        assert_eq!(OptionValue::from(true).type_name(), "boolean");
        assert_eq!(OptionValue::from(3i64).type_name(), "number");
        assert_eq!(OptionValue::Float(1.5).type_name(), "number");
    }

    #[test]
    fn test_check_result_output_path_only_on_success() {
        let passed = CheckResult::passed(Some("/tmp/out.mp4".to_string()));
        assert!(passed.is_correct());
        assert_eq!(passed.message(), "");
        assert_eq!(passed.output_file_path(), Some("/tmp/out.mp4"));

        let failed = CheckResult::failed(MediaError::OutputAllocation);
        assert!(!failed.is_correct());
        assert_eq!(failed.output_file_path(), None);
        assert_eq!(failed.message(), ERROR_OCCUR_WHILE_GENERATING_OUTPUT_FILE);
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Cut.to_string(), "cut");
        assert_eq!(Operation::ConvertTo.to_string(), "convertTo");
    }

    #[test]
    fn test_execution_outcome() {
        assert!(ExecutionOutcome::new(0).is_success());
        assert!(!ExecutionOutcome::new(ExecutionOutcome::CANCELLED).is_success());
    }
}
