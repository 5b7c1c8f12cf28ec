use super::*;

// -- sanitize_cache_key --

#[test]
fn test_sanitize_replaces_every_unsafe_char() {
    assert_eq!(sanitize_cache_key(r#"a:b/c\d<e>f*g?h|i"j"#), "a_b_c_d_e_f_g_h_i_j");
}

#[test]
fn test_sanitize_keeps_safe_chars() {
    assert_eq!(
        sanitize_cache_key("Lumines (USA) [v1.01] - Disc.1"),
        "Lumines (USA) [v1.01] - Disc.1"
    );
    assert_eq!(sanitize_cache_key(""), "");
}

#[test]
fn test_sanitize_keeps_unicode() {
    assert_eq!(sanitize_cache_key("パタポン:2"), "パタポン_2");
}

// -- display_name_from_filename --

#[test]
fn test_display_name_strips_tags_and_extension() {
    assert_eq!(display_name_from_filename("Patapon_(USA)_[!].iso"), "Patapon");
    assert_eq!(
        display_name_from_filename("Metal Gear Solid - Peace Walker (Europe) (En,Fr).pbp"),
        "Metal Gear Solid Peace Walker"
    );
}

#[test]
fn test_display_name_separators_become_spaces() {
    assert_eq!(
        display_name_from_filename("Crisis_Core-Final_Fantasy_VII.iso"),
        "Crisis Core Final Fantasy VII"
    );
}

#[test]
fn test_display_name_without_extension() {
    assert_eq!(display_name_from_filename("EBOOT"), "EBOOT");
}

#[test]
fn test_display_name_unbalanced_paren_is_kept() {
    assert_eq!(
        display_name_from_filename("Loco Roco (Demo.iso"),
        "Loco Roco (Demo"
    );
}

#[test]
fn test_display_name_falls_back_to_filename() {
    assert_eq!(display_name_from_filename("(USA).iso"), "(USA).iso");
    assert_eq!(display_name_from_filename("___.cso"), "___.cso");
}

// -- clean_title --

#[test]
fn test_clean_title_strips_nul_padding() {
    assert_eq!(clean_title("Test Game\0\0\0"), "Test Game");
    assert_eq!(clean_title("  Spaced \0"), "Spaced");
    assert_eq!(clean_title("\0"), "");
}

#[test]
fn test_clean_title_keeps_inner_content() {
    assert_eq!(clean_title("Ape Escape: On the Loose"), "Ape Escape: On the Loose");
}
