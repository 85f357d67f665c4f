use crate::rule::{CaseMode, RuleKind};
use regex::Regex;

pub fn apply_rule(kind: &RuleKind, name: &str, index: usize) -> String {
    match kind {
        RuleKind::Replace {
            search,
            replace,
            use_regex,
        } => apply_replace(name, search, replace, *use_regex),
        RuleKind::Affixes { prefix, suffix } => {
            let (stem, ext) = split_stem_ext(name);
            format!("{prefix}{stem}{suffix}{ext}")
        }
        RuleKind::Case { mode } => {
            let (stem, ext) = split_stem_ext(name);
            format!("{}{ext}", apply_case(stem, *mode))
        }
        RuleKind::Sequence {
            start,
            pad,
            separator,
        } => {
            let (stem, ext) = split_stem_ext(name);
            let value = start + index as i64;
            format!("{stem}{separator}{value:0width$}{ext}", width = *pad)
        }
    }
}

fn apply_replace(name: &str, search: &str, replace: &str, use_regex: bool) -> String {
    if use_regex {
        match Regex::new(search) {
            Ok(re) => re.replace_all(name, replace).into_owned(),
            Err(_) => name.to_string(),
        }
    } else if search.is_empty() {
        name.to_string()
    } else {
        name.replace(search, replace)
    }
}

fn apply_case(stem: &str, mode: CaseMode) -> String {
    match mode {
        CaseMode::Upper => stem.to_uppercase(),
        CaseMode::Lower => stem.to_lowercase(),
        CaseMode::Title => title_case(stem),
        CaseMode::Sentence => sentence_case(stem),
    }
}

fn title_case(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut at_word_start = true;
    for ch in stem.chars() {
        if is_word_boundary(ch) {
            at_word_start = true;
            out.push(ch);
        } else if at_word_start {
            at_word_start = false;
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

fn sentence_case(stem: &str) -> String {
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(stem.len());
            out.extend(first.to_uppercase());
            out.extend(chars.flat_map(|c| c.to_lowercase()));
            out
        }
        None => String::new(),
    }
}

fn is_word_boundary(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '_' | '-' | '.')
}

pub fn split_stem_ext(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => name.split_at(pos),
        _ => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replace(search: &str, replace: &str, use_regex: bool) -> RuleKind {
        RuleKind::Replace {
            search: search.to_string(),
            replace: replace.to_string(),
            use_regex,
        }
    }

    #[test]
    fn literal_replace_hits_all_occurrences() {
        let kind = replace("foo", "bar", false);
        assert_eq!(apply_rule(&kind, "foo_foo.txt", 0), "bar_bar.txt");
    }

    #[test]
    fn literal_replace_sees_the_extension() {
        let kind = replace(".jpeg", ".jpg", false);
        assert_eq!(apply_rule(&kind, "photo.jpeg", 0), "photo.jpg");
    }

    #[test]
    fn empty_search_is_a_noop() {
        let kind = replace("", "x", false);
        assert_eq!(apply_rule(&kind, "photo.jpg", 0), "photo.jpg");
    }

    #[test]
    fn regex_replace_supports_groups() {
        let kind = replace(r"IMG_(\d+)", "photo_$1", true);
        assert_eq!(apply_rule(&kind, "IMG_0042.jpg", 0), "photo_0042.jpg");
    }

    #[test]
    fn regex_absent_group_expands_empty() {
        let kind = replace(r"IMG", "x$9", true);
        assert_eq!(apply_rule(&kind, "IMG.jpg", 0), "x.jpg");
    }

    #[test]
    fn broken_regex_degrades_to_noop() {
        let kind = replace("[unclosed", "x", true);
        assert_eq!(apply_rule(&kind, "IMG.jpg", 0), "IMG.jpg");
    }

    #[test]
    fn affixes_wrap_the_stem_only() {
        let kind = RuleKind::Affixes {
            prefix: "2024_".to_string(),
            suffix: "_final".to_string(),
        };
        assert_eq!(apply_rule(&kind, "report.pdf", 0), "2024_report_final.pdf");
    }

    #[test]
    fn affixes_without_extension_use_whole_name() {
        let kind = RuleKind::Affixes {
            prefix: "a_".to_string(),
            suffix: "_z".to_string(),
        };
        assert_eq!(apply_rule(&kind, "README", 0), "a_README_z");
    }

    #[test]
    fn case_preserves_the_extension() {
        let kind = RuleKind::Case {
            mode: CaseMode::Upper,
        };
        assert_eq!(apply_rule(&kind, "photo.JPG", 0), "PHOTO.JPG");
        let kind = RuleKind::Case {
            mode: CaseMode::Lower,
        };
        assert_eq!(apply_rule(&kind, "PHOTO.JPG", 0), "photo.JPG");
    }

    #[test]
    fn upper_case_is_idempotent() {
        let kind = RuleKind::Case {
            mode: CaseMode::Upper,
        };
        let once = apply_rule(&kind, "Mixed Name.txt", 0);
        let twice = apply_rule(&kind, &once, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn title_case_capitalizes_each_word() {
        let kind = RuleKind::Case {
            mode: CaseMode::Title,
        };
        assert_eq!(
            apply_rule(&kind, "my holiday_photos-2024.jpg", 0),
            "My Holiday_Photos-2024.jpg"
        );
    }

    #[test]
    fn sentence_case_touches_only_the_first_letter() {
        let kind = RuleKind::Case {
            mode: CaseMode::Sentence,
        };
        assert_eq!(apply_rule(&kind, "MY HOLIDAY.jpg", 0), "My holiday.jpg");
    }

    #[test]
    fn sequence_appends_padded_index_to_stem() {
        let kind = RuleKind::Sequence {
            start: 1,
            pad: 3,
            separator: "_".to_string(),
        };
        assert_eq!(apply_rule(&kind, "photo.jpg", 0), "photo_001.jpg");
        assert_eq!(apply_rule(&kind, "photo.jpg", 41), "photo_042.jpg");
    }

    #[test]
    fn sequence_never_truncates_wide_indexes() {
        let kind = RuleKind::Sequence {
            start: 998,
            pad: 2,
            separator: "-".to_string(),
        };
        assert_eq!(apply_rule(&kind, "photo.jpg", 4), "photo-1002.jpg");
    }

    #[test]
    fn split_stem_ext_handles_edge_names() {
        assert_eq!(split_stem_ext("a.b.c.txt"), ("a.b.c", ".txt"));
        assert_eq!(split_stem_ext("README"), ("README", ""));
        assert_eq!(split_stem_ext(".gitignore"), (".gitignore", ""));
    }
}
