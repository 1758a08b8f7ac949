use super::{FmtSink, Tokenizer, TokenizerConfig, tokenize};
use crate::html5::shared::{ParseError, ParseErrorCode, TokenPools, TokenRef};

fn run(input: &str) -> (bool, Vec<String>, Vec<ParseError>) {
    let mut sink = FmtSink::new();
    let mut tokenizer = Tokenizer::new(input, TokenPools::new(), TokenizerConfig::default());
    let produced = tokenizer.tokenize(&mut sink);
    let errors = tokenizer.parse_errors().to_vec();
    (produced, sink.into_tokens(), errors)
}

fn run_tokens(input: &str) -> Vec<String> {
    run(input).1
}

fn run_error_codes(input: &str) -> Vec<ParseErrorCode> {
    run(input).2.iter().map(|e| e.code).collect()
}

#[test]
fn empty_input_produces_nothing() {
    let (produced, tokens, errors) = run("");
    assert!(!produced, "empty input must report no production");
    assert!(tokens.is_empty(), "no tokens for empty input: {tokens:?}");
    assert!(errors.is_empty(), "no errors for empty input: {errors:?}");
}

#[test]
fn plain_text_is_one_character_token() {
    let (produced, tokens, errors) = run("hello");
    assert!(produced);
    assert_eq!(tokens, vec!["CHAR text=\"hello\"", "EOF"]);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn adjacent_characters_merge_regardless_of_run_length() {
    for n in [1usize, 2, 7, 256, 4096] {
        let input = "x".repeat(n);
        let tokens = run_tokens(&input);
        assert_eq!(
            tokens,
            vec![format!("CHAR text=\"{input}\""), "EOF".to_string()],
            "a run of {n} characters must merge into one token"
        );
    }
}

#[test]
fn text_merges_across_decoded_references() {
    let tokens = run_tokens("a&amp;b");
    assert_eq!(tokens, vec!["CHAR text=\"a&b\"", "EOF"]);
}

#[test]
fn basic_tag_states_emit_expected_tokens() {
    let tokens = run_tokens("<div>Hello</div>");
    assert_eq!(
        tokens,
        vec![
            "START name=div attrs=[] self_closing=false",
            "CHAR text=\"Hello\"",
            "END name=div",
            "EOF",
        ]
    );
}

#[test]
fn tag_names_fold_to_ascii_lowercase() {
    let tokens = run_tokens("<DiV>x</DIV>");
    assert_eq!(
        tokens,
        vec![
            "START name=div attrs=[] self_closing=false",
            "CHAR text=\"x\"",
            "END name=div",
            "EOF",
        ]
    );
}

#[test]
fn attributes_preserve_encounter_order_and_quote_styles() {
    let tokens = run_tokens("<a href=\"x\" class='b' id=c checked>");
    assert_eq!(
        tokens,
        vec![
            "START name=a attrs=[href=\"x\" class=\"b\" id=\"c\" checked] self_closing=false",
            "EOF",
        ]
    );
}

#[test]
fn equals_with_no_value_commits_an_empty_value() {
    let tokens = run_tokens("<a b=>");
    assert_eq!(
        tokens,
        vec!["START name=a attrs=[b=\"\"] self_closing=false", "EOF"]
    );
    assert_eq!(
        run_error_codes("<a b=>"),
        vec![ParseErrorCode::MissingAttributeValue]
    );
}

#[test]
fn duplicate_attribute_keeps_first_and_records_error() {
    let (_, tokens, errors) = run("<a id=1 id=2>");
    assert_eq!(
        tokens,
        vec!["START name=a attrs=[id=\"1\"] self_closing=false", "EOF"]
    );
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::DuplicateAttribute]
    );
}

#[test]
fn self_closing_tag_sets_flag() {
    let tokens = run_tokens("<br/>");
    assert_eq!(
        tokens,
        vec!["START name=br attrs=[] self_closing=true", "EOF"]
    );
}

#[test]
fn invalid_first_tag_character_falls_back_to_text() {
    let (produced, tokens, errors) = run("<,ds>");
    assert!(produced);
    assert_eq!(tokens, vec!["CHAR text=\"<,ds>\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::InvalidFirstCharacterOfTagName]
    );
}

#[test]
fn end_tag_with_attributes_drops_them_with_error() {
    let (_, tokens, errors) = run("</div id=x>");
    assert_eq!(tokens, vec!["END name=div", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::EndTagWithAttributes]
    );
}

#[test]
fn missing_end_tag_name_emits_nothing() {
    let (_, tokens, errors) = run("</>");
    assert_eq!(tokens, vec!["EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::MissingEndTagName]
    );
}

// --- character references ---

#[test]
fn named_reference_decodes_outside_attributes() {
    let (produced, tokens, errors) = run("&amp;");
    assert!(produced);
    assert_eq!(tokens, vec!["CHAR text=\"&\"", "EOF"]);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn unknown_semicolon_reference_stays_literal_with_ambiguous_error() {
    let (_, tokens, errors) = run("&ampnotareal;");
    assert_eq!(tokens, vec!["CHAR text=\"&ampnotareal;\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::AmbiguousAmpersand]
    );
}

#[test]
fn lone_ampersand_passes_through_as_text() {
    let (_, tokens, errors) = run("a & b");
    assert_eq!(tokens, vec!["CHAR text=\"a & b\"", "EOF"]);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn legacy_reference_without_semicolon_decodes_with_error() {
    let (_, tokens, errors) = run("&not x");
    assert_eq!(tokens, vec!["CHAR text=\"\u{00AC} x\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::MissingSemicolonAfterCharacterReference]
    );
}

#[test]
fn prefix_candidate_decodes_and_pushes_back_tail() {
    let (_, tokens, errors) = run("&notin x");
    assert_eq!(tokens, vec!["CHAR text=\"\u{00AC}in x\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::MissingSemicolonAfterCharacterReference]
    );
}

#[test]
fn longer_reference_wins_over_its_legacy_prefix() {
    let (_, tokens, errors) = run("&notin;");
    assert_eq!(tokens, vec!["CHAR text=\"\u{2209}\"", "EOF"]);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn reference_in_attribute_value_decodes_into_the_value() {
    let (_, tokens, errors) = run("<a href=\"x&amp;y\">");
    assert_eq!(
        tokens,
        vec!["START name=a attrs=[href=\"x&y\"] self_closing=false", "EOF"]
    );
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn reference_with_alphanumeric_tail_stays_literal_in_attributes() {
    let (_, tokens, errors) = run("<a b=\"&notx\">");
    assert_eq!(
        tokens,
        vec!["START name=a attrs=[b=\"&notx\"] self_closing=false", "EOF"]
    );
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn reference_before_equals_stays_literal_in_attributes() {
    let (_, tokens, errors) = run("<a b=\"&not=x\">");
    assert_eq!(
        tokens,
        vec!["START name=a attrs=[b=\"&not=x\"] self_closing=false", "EOF"]
    );
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn numeric_references_decode_in_both_bases() {
    assert_eq!(
        run_tokens("&#65;&#x41;&#X42;"),
        vec!["CHAR text=\"AAB\"", "EOF"]
    );
}

#[test]
fn numeric_reference_zero_yields_replacement() {
    let (_, tokens, errors) = run("&#0;");
    assert_eq!(tokens, vec!["CHAR text=\"\u{FFFD}\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::NullCharacterReference]
    );
}

#[test]
fn numeric_reference_out_of_range_yields_replacement() {
    let (_, tokens, errors) = run("&#x110000;");
    assert_eq!(tokens, vec!["CHAR text=\"\u{FFFD}\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::CharacterReferenceOutsideUnicodeRange]
    );
}

#[test]
fn numeric_reference_surrogate_yields_replacement() {
    let (_, tokens, errors) = run("&#xD800;");
    assert_eq!(tokens, vec!["CHAR text=\"\u{FFFD}\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::SurrogateCharacterReference]
    );
}

#[test]
fn numeric_reference_noncharacter_is_suppressed() {
    let (_, tokens, errors) = run("a&#xFDD0;b");
    assert_eq!(tokens, vec!["CHAR text=\"ab\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::NoncharacterCharacterReference]
    );
}

#[test]
fn numeric_reference_control_range_remaps_to_windows_1252() {
    let (_, tokens, errors) = run("&#x80;");
    assert_eq!(tokens, vec!["CHAR text=\"\u{20AC}\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::ControlCharacterReference]
    );

    // 0x81 is one of the five identity entries.
    let (_, tokens, errors) = run("&#x81;");
    assert_eq!(tokens, vec!["CHAR text=\"\u{81}\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::ControlCharacterReference]
    );
}

#[test]
fn numeric_reference_carriage_return_errors_but_decodes() {
    let (_, tokens, errors) = run("&#13;");
    assert_eq!(tokens, vec!["CHAR text=\"\\r\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::ControlCharacterReference]
    );
}

#[test]
fn numeric_reference_without_digits_stays_literal() {
    let (_, tokens, errors) = run("&#;");
    assert_eq!(tokens, vec!["CHAR text=\"&#;\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::AbsenceOfDigitsInNumericCharacterReference]
    );
}

#[test]
fn numeric_reference_missing_semicolon_still_decodes() {
    let (_, tokens, errors) = run("&#65 ");
    assert_eq!(tokens, vec!["CHAR text=\"A \"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::MissingSemicolonAfterCharacterReference]
    );
}

#[test]
fn numeric_reference_at_end_of_input_resolves() {
    let (_, tokens, errors) = run("&#65;");
    assert_eq!(tokens, vec!["CHAR text=\"A\"", "EOF"]);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

// --- comments ---

#[test]
fn comment_round_trip() {
    let tokens = run_tokens("<!--x-->tail");
    assert_eq!(
        tokens,
        vec!["COMMENT text=\"x\"", "CHAR text=\"tail\"", "EOF"]
    );
}

#[test]
fn unterminated_comment_flushes_at_end_of_input() {
    let (produced, tokens, errors) = run("<!--abc");
    assert!(produced);
    assert_eq!(tokens, vec!["COMMENT text=\"abc\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::EofInComment]
    );
}

#[test]
fn nested_comment_opener_records_error_and_closes() {
    let (_, tokens, errors) = run("<!--a<!--b-->");
    assert_eq!(tokens, vec!["COMMENT text=\"a<!--b\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::NestedComment]
    );
}

#[test]
fn comment_end_bang_closes_with_error() {
    let (_, tokens, errors) = run("<!--x--!>");
    assert_eq!(tokens, vec!["COMMENT text=\"x\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::IncorrectlyClosedComment]
    );
}

#[test]
fn abruptly_closed_empty_comments() {
    let (_, tokens, errors) = run("<!-->");
    assert_eq!(tokens, vec!["COMMENT text=\"\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::AbruptClosingOfEmptyComment]
    );

    let (_, tokens, errors) = run("<!--->");
    assert_eq!(tokens, vec!["COMMENT text=\"\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::AbruptClosingOfEmptyComment]
    );
}

#[test]
fn bogus_comment_from_question_mark() {
    let (_, tokens, errors) = run("<?php?>");
    assert_eq!(tokens, vec!["COMMENT text=\"?php?\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::UnexpectedQuestionMarkInsteadOfTagName]
    );
}

// --- DOCTYPE ---

#[test]
fn simple_doctype_has_no_errors() {
    let (produced, tokens, errors) = run("<!DOCTYPE html>");
    assert!(produced);
    assert_eq!(
        tokens,
        vec![
            "DOCTYPE name=html public_id=null system_id=null force_quirks=false",
            "EOF",
        ]
    );
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn doctype_keyword_is_case_insensitive() {
    let tokens = run_tokens("<!dOcTyPe HTML>");
    assert_eq!(
        tokens,
        vec![
            "DOCTYPE name=html public_id=null system_id=null force_quirks=false",
            "EOF",
        ]
    );
}

#[test]
fn doctype_public_and_system_identifiers_parse_in_both_quote_styles() {
    let input = "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\" 'http://x/strict.dtd'>";
    let (_, tokens, errors) = run(input);
    assert_eq!(
        tokens,
        vec![
            "DOCTYPE name=html public_id=\"-//W3C//DTD HTML 4.01//EN\" \
             system_id=\"http://x/strict.dtd\" force_quirks=false",
            "EOF",
        ]
    );
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn doctype_system_keyword_alone_parses_identifier() {
    let (_, tokens, errors) = run("<!DOCTYPE html SYSTEM \"about:legacy-compat\">");
    assert_eq!(
        tokens,
        vec![
            "DOCTYPE name=html public_id=null system_id=\"about:legacy-compat\" \
             force_quirks=false",
            "EOF",
        ]
    );
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn doctype_junk_after_name_forces_quirks() {
    let (_, tokens, errors) = run("<!DOCTYPE html x>");
    assert_eq!(
        tokens,
        vec![
            "DOCTYPE name=html public_id=null system_id=null force_quirks=true",
            "EOF",
        ]
    );
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::InvalidCharacterSequenceAfterDoctypeName]
    );
}

#[test]
fn doctype_without_name_forces_quirks() {
    let (_, tokens, errors) = run("<!DOCTYPE>");
    assert_eq!(
        tokens,
        vec![
            "DOCTYPE name=null public_id=null system_id=null force_quirks=true",
            "EOF",
        ]
    );
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::MissingDoctypeName]
    );
}

#[test]
fn missing_whitespace_before_doctype_name_is_recovered() {
    let (_, tokens, errors) = run("<!DOCTYPEhtml>");
    assert_eq!(
        tokens,
        vec![
            "DOCTYPE name=html public_id=null system_id=null force_quirks=false",
            "EOF",
        ]
    );
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::MissingWhitespaceBeforeDoctypeName]
    );
}

#[test]
fn unterminated_doctype_is_force_quirked_at_end_of_input() {
    let (_, tokens, errors) = run("<!DOCTYPE html");
    assert_eq!(
        tokens,
        vec![
            "DOCTYPE name=html public_id=null system_id=null force_quirks=true",
            "EOF",
        ]
    );
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::EofInDoctype]
    );
}

// --- CDATA ---

#[test]
fn cdata_section_round_trip() {
    let (_, tokens, errors) = run("<![CDATA[x]]>");
    assert_eq!(tokens, vec!["CDATA text=\"x\"", "EOF"]);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn cdata_section_keeps_interior_brackets() {
    let tokens = run_tokens("<![CDATA[a]]b]]>");
    assert_eq!(tokens, vec!["CDATA text=\"a]]b\"", "EOF"]);
}

#[test]
fn unterminated_cdata_flushes_at_end_of_input() {
    let (_, tokens, errors) = run("<![CDATA[x");
    assert_eq!(tokens, vec!["CDATA text=\"x\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::EofInCdata]
    );
}

// --- end of input ---

#[test]
fn lone_angle_bracket_becomes_text_at_end_of_input() {
    let (_, tokens, errors) = run("<");
    assert_eq!(tokens, vec!["CHAR text=\"<\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::EofBeforeTagName]
    );

    let (_, tokens, errors) = run("</");
    assert_eq!(tokens, vec!["CHAR text=\"</\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::EofBeforeTagName]
    );
}

#[test]
fn unterminated_tag_is_dropped_at_end_of_input() {
    let (_, tokens, errors) = run("<div class=x");
    assert_eq!(tokens, vec!["EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::EofInTag]
    );
}

#[test]
fn reference_in_attribute_at_end_of_input_reports_both_errors() {
    let (_, tokens, errors) = run("<a b=\"&amp");
    assert_eq!(tokens, vec!["EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![
            ParseErrorCode::MissingSemicolonAfterCharacterReference,
            ParseErrorCode::EofInTag,
        ]
    );
}

// --- positions ---

#[test]
fn error_positions_track_lines_and_columns_across_newline_styles() {
    // 'a' LF 'b' CR LF 'c' '<' ',': the error lands on ',' at byte 7,
    // line 3 (LF, then CRLF counted once), column 2.
    let (_, _, errors) = run("a\nb\r\nc<,");
    assert_eq!(errors.len(), 1);
    let error = errors[0];
    assert_eq!(error.code, ParseErrorCode::InvalidFirstCharacterOfTagName);
    assert_eq!(error.position, 7);
    assert_eq!(error.line, 3);
    assert_eq!(error.column, 2);
}

#[test]
fn cr_alone_advances_the_line_counter() {
    let (_, _, errors) = run("a\rb<,");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 2);
    assert_eq!(errors[0].column, 2);
}

// --- emission protocol and pools ---

#[test]
fn pools_are_empty_after_a_normal_run() {
    let mut sink = FmtSink::new();
    let mut tokenizer = Tokenizer::new(
        "<!DOCTYPE html><p class=x>hi &amp; bye</p><!--c-->",
        TokenPools::new(),
        TokenizerConfig::default(),
    );
    assert!(tokenizer.tokenize(&mut sink));
    let pools = tokenizer.into_pools();
    assert_eq!(
        pools.live_tokens(),
        0,
        "every emitted token must be released back to its pool"
    );
}

#[test]
fn keep_tokens_mode_retains_consumed_tokens() {
    let mut sink = FmtSink::new();
    let mut tokenizer = Tokenizer::new(
        "<b>x</b>",
        TokenPools::new(),
        TokenizerConfig { keep_tokens: true },
    );
    assert!(tokenizer.tokenize(&mut sink));

    let kept: Vec<TokenRef<'_>> = tokenizer.kept_tokens().collect();
    assert_eq!(kept.len(), 4, "START, CHAR, END, EOF must be retained");
    assert!(
        kept.iter().all(|token| token.is_consumed()),
        "retained tokens must be marked consumed"
    );
    assert!(matches!(kept[0], TokenRef::StartTag(_)));
    assert!(matches!(kept[1], TokenRef::Character(_)));
    assert!(matches!(kept[2], TokenRef::EndTag(_)));
    assert!(matches!(kept[3], TokenRef::EndOfFile(_)));

    assert_eq!(
        sink.tokens(),
        [
            "START name=b attrs=[] self_closing=false",
            "CHAR text=\"x\"",
            "END name=b",
            "EOF",
        ]
    );
}

#[test]
fn stats_count_emitted_tokens() {
    let mut sink = FmtSink::new();
    let mut tokenizer = Tokenizer::new(
        "<div>Hello</div>",
        TokenPools::new(),
        TokenizerConfig::default(),
    );
    assert!(tokenizer.tokenize(&mut sink));
    let stats = tokenizer.stats();
    assert_eq!(stats.tokens_emitted as usize, sink.tokens().len());
    assert!(stats.steps > 0);
    assert!(stats.state_transitions > 0);
}

#[test]
fn convenience_wrapper_matches_explicit_construction() {
    let mut sink = FmtSink::new();
    let (produced, errors) = tokenize("<p>&amp;</p>", &mut sink);
    assert!(produced);
    assert!(errors.is_empty());
    assert_eq!(
        sink.tokens(),
        [
            "START name=p attrs=[] self_closing=false",
            "CHAR text=\"&\"",
            "END name=p",
            "EOF",
        ]
    );
}

#[test]
#[should_panic(expected = "called twice")]
fn tokenize_twice_panics() {
    let mut sink = FmtSink::new();
    let mut tokenizer = Tokenizer::new("x", TokenPools::new(), TokenizerConfig::default());
    let _ = tokenizer.tokenize(&mut sink);
    let _ = tokenizer.tokenize(&mut sink);
}

#[test]
fn null_character_in_data_passes_through_with_error() {
    let (_, tokens, errors) = run("a\0b");
    assert_eq!(tokens, vec!["CHAR text=\"a\\u{00}b\"", "EOF"]);
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::UnexpectedNullCharacter]
    );
}

#[test]
fn null_character_in_tag_name_is_replaced() {
    let tokens = run_tokens("<a\0b>");
    assert_eq!(
        tokens,
        vec!["START name=a\u{FFFD}b attrs=[] self_closing=false", "EOF"]
    );
}

#[test]
fn missing_whitespace_between_attributes_recovers() {
    let (_, tokens, errors) = run("<a b=\"1\"c=\"2\">");
    assert_eq!(
        tokens,
        vec![
            "START name=a attrs=[b=\"1\" c=\"2\"] self_closing=false",
            "EOF",
        ]
    );
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::MissingWhitespaceBetweenAttributes]
    );
}

#[test]
fn stray_solidus_inside_tag_recovers() {
    let (_, tokens, errors) = run("<a / b>");
    assert_eq!(
        tokens,
        vec!["START name=a attrs=[b] self_closing=false", "EOF"]
    );
    assert_eq!(
        errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::UnexpectedSolidusInTag]
    );
}
