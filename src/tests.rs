use proptest::prelude::*;

use crate::keys;
use crate::{Action, Engine, EngineConfig, InputMethod, Shortcut, SyllableState};

/// Types `seq` and returns what the text field shows.
fn type_seq(engine: &mut Engine, seq: &str) -> String {
    let mut screen = String::new();
    for c in seq.chars() {
        engine.feed(c).apply_to(&mut screen, Some(c));
    }
    screen
}

fn telex(seq: &str) -> String {
    type_seq(&mut Engine::new(), seq)
}

fn type_seq_vni(seq: &str) -> String {
    let mut e = Engine::new();
    e.set_input_method(InputMethod::Vni);
    type_seq(&mut e, seq)
}

#[test]
fn telex_modifier_basic() {
    assert_eq!(telex("aa"), "â");
    assert_eq!(telex("aw"), "ă");
    assert_eq!(telex("ee"), "ê");
    assert_eq!(telex("oo"), "ô");
    assert_eq!(telex("ow"), "ơ");
    assert_eq!(telex("uw"), "ư");
    assert_eq!(telex("dd"), "đ");
    assert_eq!(telex("w"), "ư");
}

#[test]
fn tone_single_vowel_all_tones() {
    assert_eq!(telex("as"), "á");
    assert_eq!(telex("af"), "à");
    assert_eq!(telex("ar"), "ả");
    assert_eq!(telex("ax"), "ã");
    assert_eq!(telex("aj"), "ạ");
}

#[test]
fn z_key_removes_tone() {
    assert_eq!(telex("asz"), "a");
    assert_eq!(telex("axz"), "a");
    // nothing to remove: an ordinary letter
    assert_eq!(telex("az"), "az");
    assert_eq!(telex("laz"), "laz");
    assert_eq!(telex("asz "), "a ");
}

#[test]
fn doubled_keys_revert() {
    assert_eq!(telex("aaa"), "aa");
    assert_eq!(telex("eee"), "ee");
    assert_eq!(telex("ooo"), "oo");
    assert_eq!(telex("ddd"), "dd");
    assert_eq!(telex("ass"), "as");
    assert_eq!(telex("ww"), "w");
}

#[test]
fn short_reverts_survive_the_boundary() {
    assert_eq!(telex("ass "), "as ");
    assert_eq!(telex("ddd "), "dd ");
    assert_eq!(telex("ww "), "w ");
}

#[test]
fn tone_on_modified_vowels() {
    assert_eq!(telex("aas"), "ấ");
    assert_eq!(telex("awj"), "ặ");
    assert_eq!(telex("ees"), "ế");
    assert_eq!(telex("oos"), "ố");
    assert_eq!(telex("ows"), "ớ");
    assert_eq!(telex("uws"), "ứ");
}

#[test]
fn last_tone_wins() {
    assert_eq!(telex("asf"), "à");
    assert_eq!(telex("afsj"), "ạ");
}

#[test]
fn tone_placement_two_vowels() {
    assert_eq!(telex("hoas"), "hoá");
    assert_eq!(telex("hoaf"), "hoà");
    assert_eq!(telex("hoans"), "hoán");
    assert_eq!(telex("hoanj"), "hoạn");
    assert_eq!(telex("hoafn"), "hoàn");

    let mut e = Engine::new();
    e.set_modern_tone(false);
    assert_eq!(type_seq(&mut e, "hoaf"), "hòa");
    assert_eq!(type_seq(&mut e, " hoafn"), " hoàn");
}

#[test]
fn tone_placement_three_vowels_targets_second_vowel() {
    assert_eq!(telex("khuya"), "khuya");
    assert_eq!(telex("khuyas"), "khuýa");
}

#[test]
fn golden_words() {
    assert_eq!(telex("vieejt"), "việt");
    assert_eq!(telex("vieetj"), "việt");
    assert_eq!(telex("nguwowif"), "người");
    assert_eq!(telex("dojcd"), "đọc");
    assert_eq!(telex("nanag"), "nâng");
    assert_eq!(telex("tuwoi"), "tươi");
    assert_eq!(telex("Tieengs Vieetj "), "Tiếng Việt ");
}

#[test]
fn chaof_resends_the_whole_word() {
    let mut e = Engine::new();
    for c in "chao".chars() {
        assert!(e.feed(c).is_none());
    }
    let r = e.feed('f');
    assert_eq!(r.action, Action::Send);
    assert_eq!(r.backspace, 4);
    assert_eq!(r.chars.as_slice(), &['c', 'h', 'à', 'o']);
    assert!(!r.forward_key);
}

#[test]
fn deferred_breve() {
    assert_eq!(telex("raw"), "raw");
    assert_eq!(telex("rawn"), "răn");
    assert_eq!(telex("raw "), "raw ");
    assert_eq!(telex("trawng"), "trăng");
}

#[test]
fn breve_survives_a_tone_before_the_final() {
    assert_eq!(telex("trawsng"), "trắng");
    assert_eq!(telex("mawsc"), "mắc");
    assert_eq!(telex("nawsng"), "nắng");
    assert_eq!(telex("trawsng "), "trắng ");
}

#[test]
fn delayed_circumflex_after_the_tone() {
    assert_eq!(telex("tiese"), "tiế");
    assert_eq!(telex("tiesen"), "tiến");
}

#[test]
fn reached_back_circumflex_reverts() {
    assert_eq!(telex("nanag"), "nâng");
    assert_eq!(telex("nanaga"), "nanga");
}

#[test]
fn later_d_strokes_only_with_a_mark() {
    assert_eq!(telex("dede"), "đê");
    assert_eq!(telex("dodo"), "đô");
    assert_eq!(telex("ded "), "ded ");
    assert_eq!(telex("dedicated "), "dedicated ");
}

#[test]
fn deferred_horn() {
    assert_eq!(telex("huow"), "huơ");
    assert_eq!(telex("huows"), "huớ");
    assert_eq!(telex("huowsng"), "hướng");
    assert_eq!(telex("dduowc"), "đươc");
    assert_eq!(telex("dduowcj"), "được");
    assert_eq!(telex("huow "), "huơ ");
}

#[test]
fn inferred_stroke_is_undone_for_foreign_words() {
    let out = telex("dausdu");
    assert!(!out.contains('đ'), "{out}");
    assert_eq!(telex("dausdu "), "dausdu ");
}

#[test]
fn stop_finals_only_take_sac_or_nang() {
    assert_eq!(telex("hocs"), "hóc");
    assert_eq!(telex("hocj"), "học");
    assert_eq!(telex("hocf"), "hocf");
    assert_eq!(telex("hocr"), "hocr");
    assert_eq!(telex("hocx"), "hocx");
    assert_eq!(telex("hocf "), "hocf ");
}

#[test]
fn invalid_words_are_restored() {
    assert_eq!(telex("tesst "), "tesst ");
    assert_eq!(telex("dausdu\n"), "dausdu\n");
}

#[test]
fn english_words_pass_through() {
    assert_eq!(telex("clear"), "clear");
    assert_eq!(telex("flan"), "flan");
    assert_eq!(telex("blob"), "blob");
    assert_eq!(telex("s"), "s");
    assert_eq!(telex("z"), "z");
}

#[test]
fn english_auto_restore_needs_the_toggle() {
    assert_eq!(telex("test "), "tét ");
    let mut e = Engine::new();
    e.set_english_auto_restore(true);
    assert_eq!(type_seq(&mut e, "test "), "test ");
    assert_eq!(type_seq(&mut e, "vieetj "), "việt ");
}

#[test]
fn consonant_after_a_foreign_word_starts_a_new_one() {
    let mut e = Engine::new();
    assert_eq!(type_seq(&mut e, "blob"), "blob");
    assert_eq!(e.state(), SyllableState::Initial);
    assert_eq!(e.buffer_string(), "b");

    // "tétin" goes back to its keys as soon as g starts the next word
    let mut e = Engine::new();
    assert_eq!(type_seq(&mut e, "testing"), "testing");
    assert_eq!(e.buffer_string(), "g");
    assert_eq!(type_seq(&mut e, " "), " ");

    assert_eq!(telex("blobaas"), "blobấ");
    // digit runs never split
    assert_eq!(telex("149k "), "149k ");
}

#[test]
fn whitespace_flushes_and_resets_buffer() {
    let mut e = Engine::new();
    assert_eq!(type_seq(&mut e, "aas "), "ấ ");
    assert_eq!(e.state(), SyllableState::Empty);
    assert_eq!(type_seq(&mut e, "as"), "á");
}

#[test]
fn valid_consonant_cluster() {
    assert_eq!(telex("nghe"), "nghe");
    assert_eq!(telex("nghes"), "nghé");
    assert_eq!(telex("nghees"), "nghế");
}

#[test]
fn vni_words() {
    assert_eq!(type_seq_vni("vie6t5"), "việt");
    assert_eq!(type_seq_vni("d9i"), "đi");
    assert_eq!(type_seq_vni("tie61ng"), "tiếng");
    assert_eq!(type_seq_vni("hoa2"), "hoà");
    assert_eq!(type_seq_vni("nu7o71c"), "nước");
    assert_eq!(type_seq_vni("d9uo7ng"), "đương");
    assert_eq!(type_seq_vni("a11"), "a1");
    assert_eq!(type_seq_vni("a10"), "a");
    assert_eq!(type_seq_vni("ddi "), "ddi ");
}

#[test]
fn escape_restores_when_enabled() {
    assert_eq!(telex("vieetj\u{1b}"), "việt");
    let mut e = Engine::new();
    e.set_esc_restore(true);
    assert_eq!(type_seq(&mut e, "vieetj\u{1b}"), "vieetj");
    assert!(e.buffer_string().is_empty());
    assert_eq!(type_seq(&mut e, "abc\u{1b}"), "abc");
}

#[test]
fn backspace_edits_the_word() {
    assert_eq!(telex("vieetj\u{8}"), "việ");
    assert_eq!(telex("vieetj\u{8}t"), "việt");
    assert_eq!(telex("ab\u{8}s"), "á");
}

#[test]
fn backspace_over_space_reopens_the_word() {
    let mut e = Engine::new();
    assert_eq!(type_seq(&mut e, "vieetj \u{8}s"), "viết");
    assert_eq!(e.buffer_string(), "viết");

    let mut e = Engine::new();
    assert_eq!(type_seq(&mut e, "vieetj  \u{8}\u{8}s"), "việts");
}

#[test]
fn shortcut_case_policy() {
    let mut e = Engine::new();
    e.add_shortcut(Shortcut::new("vn", "Việt Nam"));
    e.add_shortcut(Shortcut::new("hn", "Hà Nội").exact());
    assert_eq!(type_seq(&mut e, "vn "), "Việt Nam ");
    assert_eq!(type_seq(&mut e, "VN "), "VIỆT NAM ");
    assert_eq!(type_seq(&mut e, "Vn "), "Việt Nam ");
    assert_eq!(type_seq(&mut e, "HN "), "Hà Nội ");
    assert_eq!(type_seq(&mut e, "hn."), "Hà Nội.");
}

#[test]
fn shortcut_prefix_and_digits() {
    let mut e = Engine::new();
    e.add_shortcut(Shortcut::new("#fne", "for next example"));
    e.add_shortcut(Shortcut::new("k", "không"));
    assert_eq!(type_seq(&mut e, "#fne "), "for next example ");
    assert_eq!(type_seq(&mut e, "149k "), "149k ");
    assert_eq!(type_seq(&mut e, "k "), "không ");
    assert_eq!(type_seq(&mut e, "(k "), "(không ");
}

#[test]
fn immediate_shortcut() {
    let mut e = Engine::new();
    e.add_shortcut(Shortcut::immediate("btw", "by the way"));
    assert_eq!(type_seq(&mut e, "btw"), "by the way");
    assert!(e.buffer_string().is_empty());
    assert!(e.remove_shortcut("btw"));
    assert_eq!(type_seq(&mut e, "btw"), "btw");
}

#[test]
fn auto_capitalize_after_sentence_end() {
    let mut e = Engine::new();
    e.set_auto_capitalize(true);
    assert_eq!(
        type_seq(&mut e, "xin chaof. tamj bieetj"),
        "xin chào. Tạm biệt"
    );
    assert_eq!(type_seq(&mut e, "\nchaof"), "\nChào");

    let mut e = Engine::new();
    assert_eq!(type_seq(&mut e, "a. b"), "a. b");
}

#[test]
fn bracket_shortcut() {
    let mut e = Engine::new();
    assert_eq!(type_seq(&mut e, "t]"), "t]");
    e.clear();
    e.set_bracket_shortcut(true);
    assert_eq!(type_seq(&mut e, "t]"), "tư");
    e.clear();
    assert_eq!(type_seq(&mut e, "t]["), "tươ");
    e.clear();
    assert_eq!(type_seq(&mut e, "k]"), "k]");
}

#[test]
fn w_shortcut_toggle() {
    let mut e = Engine::new();
    e.set_skip_w_shortcut(true);
    assert_eq!(type_seq(&mut e, "w"), "w");
    e.clear();
    assert_eq!(type_seq(&mut e, "tw"), "tư");
}

#[test]
fn enter_and_tab_forward_the_key() {
    let mut e = Engine::new();
    let r = e.process_key(keys::RETURN, false, false, false);
    assert!(r.is_none());
    assert!(r.forward_key);
    assert_eq!(telex("vieetj\n"), "việt\n");
    assert_eq!(telex("vieetj\t"), "việt\t");
}

#[test]
fn ctrl_and_cursor_keys_drop_the_word() {
    let mut e = Engine::new();
    type_seq(&mut e, "vie");
    assert!(e.process_key(keys::C, false, true, false).is_none());
    assert!(e.buffer_string().is_empty());

    type_seq(&mut e, "vie");
    assert!(e.process_key(keys::LEFT, false, false, false).is_none());
    assert!(e.buffer_string().is_empty());
    assert_eq!(type_seq(&mut e, "e"), "e");
}

#[test]
fn disabled_engine_passes_everything_through() {
    let mut e = Engine::new();
    e.set_enabled(false);
    assert_eq!(type_seq(&mut e, "vieetj "), "vieetj ");
    e.set_enabled(true);
    assert_eq!(type_seq(&mut e, "vieetj "), "việt ");
}

#[test]
fn long_words_overflow_into_passthrough() {
    let (keys, shown) = overflowing_word();
    let mut e = Engine::new();
    let out = type_seq(&mut e, &format!("{keys} vieetj"));
    assert_eq!(out, format!("{shown} việt"));
}

fn overflowing_word() -> (String, String) {
    let tail = "n".repeat(36);
    (format!("vieetj{tail}"), format!("việt{tail}"))
}

#[test]
fn backspace_over_space_skips_an_overflowed_word() {
    let (keys, shown) = overflowing_word();
    let mut e = Engine::new();
    e.set_esc_restore(true);
    let out = type_seq(&mut e, &format!("{keys} \u{8}\u{1b}"));
    assert_eq!(out, shown);
    assert!(e.buffer_string().is_empty());

    let mut e = Engine::new();
    let out = type_seq(&mut e, &format!("xin {keys} \u{8}s"));
    assert_eq!(out, format!("xin {shown}s"));
}

#[test]
fn escape_after_overflow_leaves_the_screen() {
    let (keys, shown) = overflowing_word();
    let mut e = Engine::new();
    e.set_esc_restore(true);
    assert_eq!(type_seq(&mut e, &format!("{keys}\u{1b}")), shown);
    assert_eq!(type_seq(&mut e, "vieetj"), "việt");
}

#[test]
fn restore_word_regenerates_keys() {
    let mut e = Engine::new();
    assert!(e.restore_word("việt"));
    assert_eq!(e.raw_string(), "vieetj");
    assert_eq!(e.state(), SyllableState::Final);
    e.feed('s');
    assert_eq!(e.buffer_string(), "viết");

    e.set_input_method(InputMethod::Vni);
    assert!(e.restore_word("Đường"));
    assert_eq!(e.raw_string(), "D9u7o7ng2");
    assert!(!e.restore_word("x+y"));
    // 64 keys for the circumflexes, then one more for the tone
    assert!(!e.restore_word(&"ế".repeat(32)));
    assert_eq!(e.raw_string(), "D9u7o7ng2");
}

#[test]
fn engine_from_json_config() {
    let config = EngineConfig::from_json(
        r#"{"method":"vni","esc_restore":true,
            "shortcuts":[{"trigger":"vn","replacement":"Việt Nam"}]}"#,
    )
    .unwrap();
    let mut e = Engine::with_config(config);
    assert_eq!(e.input_method(), InputMethod::Vni);
    assert_eq!(e.shortcuts().len(), 1);
    assert!(e.config().esc_restore);
    assert_eq!(type_seq(&mut e, "vn "), "Việt Nam ");
}

proptest! {
    #[test]
    fn escape_always_gives_back_the_keys(seq in "[a-z]{1,12}") {
        let mut e = Engine::new();
        e.set_esc_restore(true);
        let out = type_seq(&mut e, &format!("{seq}\u{1b}"));
        prop_assert_eq!(out, seq);
    }

    #[test]
    fn vni_escape_always_gives_back_the_keys(seq in "[a-z0-9]{1,12}") {
        let mut e = Engine::new();
        e.set_input_method(InputMethod::Vni);
        e.set_esc_restore(true);
        let out = type_seq(&mut e, &format!("{seq}\u{1b}"));
        prop_assert_eq!(out, seq);
    }

    #[test]
    fn overflow_never_breaks_the_next_word(seq in "[a-z]{33,90}") {
        let mut e = Engine::new();
        type_seq(&mut e, &seq);
        e.feed(' ');
        prop_assert_eq!(e.state(), SyllableState::Empty);
        prop_assert_eq!(type_seq(&mut e, "vieetj"), "việt");
    }

    #[test]
    fn screen_tracks_the_buffer(seq in "[a-z]{1,20}") {
        let mut e = Engine::new();
        let out = type_seq(&mut e, &seq);
        // earlier foreign segments are already sealed on screen
        prop_assert!(out.ends_with(&e.buffer_string()), "{} / {}", out, e.buffer_string());
    }
}
