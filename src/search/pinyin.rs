//! Pinyin syllable recognition (spec.md §4.5.1 "Pinyin"/"PinyinAcronym"
//! mode detection).
//!
//! `is_pinyin_sequence` decides whether a typed string could plausibly be
//! a run of pinyin syllables, by recursively trying every longest-match-
//! first segmentation against a closed table (spec.md §9 supplemented
//! feature, grounded in the original's `isPinyinSequenceHelper`).

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Every valid pinyin syllable this crate recognizes, longest segment
/// first during matching (up to 6 characters, spec.md).
static VALID_SYLLABLES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "o", "e", "ai", "ei", "ao", "ou", "an", "en", "ang", "eng", "er",
        "ba", "bo", "bi", "bu", "bai", "bei", "bao", "ban", "ben", "bin", "bie", "biao", "bian", "bing", "bang", "beng",
        "pa", "po", "pi", "pu", "pai", "pei", "pao", "pan", "pen", "pin", "pie", "piao", "pian", "ping", "pang", "peng",
        "ma", "mo", "me", "mi", "mu", "mai", "mei", "mao", "mou", "man", "men", "min", "mie", "miao", "miu", "mian", "ming", "mang", "meng",
        "fa", "fo", "fu", "fei", "fan", "fen", "fang", "feng",
        "da", "de", "di", "du", "dai", "dao", "dou", "dan", "den", "dang", "deng", "ding", "dong", "die", "diao", "diu", "dian", "duan", "dun", "duo",
        "ta", "te", "ti", "tu", "tai", "tao", "tou", "tan", "tang", "teng", "ting", "tong", "tie", "tiao", "tian", "tuan", "tun", "tuo",
        "na", "ne", "ni", "nu", "nv", "nai", "nei", "nao", "nou", "nan", "nen", "nang", "neng", "ning", "nong", "nie", "niao", "niu", "nian", "niang", "nuan", "nve", "nuo", "nun",
        "la", "le", "li", "lu", "lv", "lai", "lei", "lao", "lou", "lan", "lang", "leng", "ling", "long", "lie", "liao", "liu", "lian", "liang", "luan", "lun", "luo", "lve",
        "ga", "ge", "gu", "gai", "gei", "gao", "gou", "gan", "gen", "gang", "geng", "gong", "gua", "guo", "guai", "gui", "guan", "gun", "guang",
        "ka", "ke", "ku", "kai", "kao", "kou", "kan", "ken", "kang", "keng", "kong", "kua", "kuo", "kuai", "kui", "kuan", "kun", "kuang",
        "ha", "he", "hu", "hai", "hei", "hao", "hou", "han", "hen", "hang", "heng", "hong", "hua", "huo", "huai", "hui", "huan", "hun", "huang",
        "ji", "ju", "jue", "jiu", "jie", "jia", "jin", "jing", "jiang", "jiong", "juan", "jun", "jian", "jiao",
        "qi", "qu", "que", "qiu", "qie", "qia", "qin", "qing", "qiang", "qiong", "quan", "qun", "qian", "qiao",
        "xi", "xu", "xue", "xiu", "xie", "xia", "xin", "xing", "xiang", "xiong", "xuan", "xun", "xian", "xiao",
        "zha", "zhe", "zhi", "zhu", "zhai", "zhao", "zhou", "zhan", "zhen", "zhang", "zheng", "zhong", "zhua", "zhuo", "zhuai", "zhui", "zhuan", "zhun", "zhuang",
        "cha", "che", "chi", "chu", "chai", "chao", "chou", "chan", "chen", "chang", "cheng", "chong", "chua", "chuo", "chuai", "chui", "chuan", "chun", "chuang",
        "sha", "she", "shi", "shu", "shai", "shao", "shou", "shan", "shen", "shang", "sheng", "shua", "shuo", "shuai", "shui", "shuan", "shun", "shuang",
        "ra", "re", "ri", "ru", "rao", "rou", "ran", "ren", "rang", "reng", "rong", "rua", "ruo", "rui", "ruan", "run",
        "za", "ze", "zi", "zu", "zai", "zei", "zao", "zou", "zan", "zen", "zang", "zeng", "zong", "zuo", "zui", "zuan", "zun",
        "ca", "ce", "ci", "cu", "cai", "cao", "cou", "can", "cen", "cang", "ceng", "cong", "cuo", "cui", "cuan", "cun",
        "sa", "se", "si", "su", "sai", "sao", "sou", "san", "sen", "sang", "seng", "song", "suo", "sui", "suan", "sun",
        "ya", "ye", "yi", "yo", "yu", "yue", "yao", "you", "yan", "yin", "yang", "ying", "yong", "yuan", "yun",
        "wa", "wo", "wu", "wai", "wei", "wan", "wen", "wang", "weng",
    ]
    .into_iter()
    .collect()
});

/// True if `input` could be parsed as one or more concatenated pinyin
/// syllables (spec.md §4.5.1 "Pinyin" query mode).
pub fn is_pinyin_sequence(input: &str) -> bool {
    if input.is_empty() {
        return false;
    }

    let chars: Vec<char> = input.to_lowercase().chars().collect();

    // A lone i/u/v/ü is never a standalone syllable.
    if chars.len() == 1 {
        let ch = chars[0];
        if matches!(ch, 'i' | 'u' | 'v' | '\u{FC}') {
            return false;
        }
    }

    // Three or more identical letters in a row ("vvv") is never pinyin.
    if chars.len() >= 3 && chars.iter().all(|&c| c == chars[0]) {
        return false;
    }

    let normalized: String = chars.into_iter().map(|c| if c == '\u{FC}' { 'v' } else { c }).collect();
    segments_with_table(&normalized, 0, &VALID_SYLLABLES, 6)
}

/// True if `input` is a plausible run of pinyin initials — the
/// "PinyinAcronym" fallback mode used when a keyword fails
/// [`is_pinyin_sequence`] (spec.md §4.5.1 "PinyinAcronym" query mode): at
/// least one ASCII letter, every character either ASCII alphanumeric or
/// one of `_`/`-`/`.`, and no CJK characters.
pub fn is_pinyin_acronym_sequence(input: &str) -> bool {
    if input.is_empty() {
        return false;
    }

    let has_ascii_letter = input.chars().any(|c| c.is_ascii_alphabetic());
    let only_allowed_chars = input.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    has_ascii_letter && only_allowed_chars
}

/// Longest-match-first recursive segmentation, exactly mirroring the
/// original: try the longest candidate (bounded by `max_len`) first and
/// recurse, backtracking to shorter candidates only on dead ends.
fn segments_with_table(chars: &str, start: usize, table: &HashSet<&'static str>, max_len: usize) -> bool {
    let rest: Vec<char> = chars.chars().skip(start).collect();
    if rest.is_empty() {
        return true;
    }

    let bound = rest.len().min(max_len);
    for len in (1..=bound).rev() {
        let candidate: String = rest[..len].iter().collect();
        if table.contains(candidate.as_str()) && segments_with_table(chars, start + len, table, max_len) {
            return true;
        }
    }
    false
}

/// Whether any path segment starts with `.` (excluding `.`/`..`), i.e.
/// the path itself or one of its ancestors is hidden (spec.md §9
/// supplemented feature 6, grounded in `isHiddenPathOrInHiddenDir`).
pub fn is_hidden_path_or_in_hidden_dir(absolute_path: &str) -> bool {
    absolute_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .any(|segment| segment.starts_with('.') && segment != "." && segment != "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_simple_syllable_runs() {
        assert!(is_pinyin_sequence("nihao"));
        assert!(is_pinyin_sequence("zhongguo"));
        assert!(is_pinyin_sequence("a"));
    }

    #[test]
    fn rejects_lone_disallowed_vowels() {
        assert!(!is_pinyin_sequence("i"));
        assert!(!is_pinyin_sequence("u"));
        assert!(!is_pinyin_sequence("v"));
    }

    #[test]
    fn rejects_repeated_letter_runs() {
        assert!(!is_pinyin_sequence("vvv"));
        assert!(!is_pinyin_sequence("aaa"));
    }

    #[test]
    fn rejects_unsegmentable_strings() {
        assert!(!is_pinyin_sequence("xyzxyz"));
        assert!(!is_pinyin_sequence(""));
    }

    #[test]
    fn acronym_sequence_accepts_initial_runs() {
        assert!(is_pinyin_acronym_sequence("nh"));
        assert!(is_pinyin_acronym_sequence("zgshb"));
    }

    #[test]
    fn acronym_sequence_accepts_digits_and_punctuation_alongside_a_letter() {
        assert!(is_pinyin_acronym_sequence("zw-1"));
        assert!(is_pinyin_acronym_sequence("file.v2"));
        assert!(is_pinyin_acronym_sequence("a1"));
    }

    #[test]
    fn acronym_sequence_rejects_strings_without_an_ascii_letter() {
        assert!(!is_pinyin_acronym_sequence("123"));
        assert!(!is_pinyin_acronym_sequence("--."));
        assert!(!is_pinyin_acronym_sequence(""));
    }

    #[test]
    fn acronym_sequence_rejects_cjk_characters() {
        assert!(!is_pinyin_acronym_sequence("中文"));
        assert!(!is_pinyin_acronym_sequence("nh中"));
    }

    #[test]
    fn hidden_dotfile_is_detected() {
        assert!(is_hidden_path_or_in_hidden_dir("/home/alice/.config/app.conf"));
        assert!(is_hidden_path_or_in_hidden_dir("/home/.alice/report.pdf"));
    }

    #[test]
    fn dot_and_dotdot_segments_are_not_hidden() {
        assert!(!is_hidden_path_or_in_hidden_dir("/home/alice/./report.pdf"));
        assert!(!is_hidden_path_or_in_hidden_dir("/home/alice/report.pdf"));
    }
}
