use std::sync::LazyLock;

use regex::Regex;

static SPACE_ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&#160").unwrap());
static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\t\n]").unwrap());
static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ ]+").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<.*?>").unwrap());
static BRACKET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[.*?\]").unwrap());

/// Markup fragment → plain text. Pass order is fixed: whitespace first, then
/// tags, then citation brackets.
pub fn clean_text(text: &str) -> String {
    let text = strip_characters(text);
    let text = strip_tags(&text);
    strip_brackets(&text)
}

/// `&#160` becomes a space (its `;` is left behind), tabs and newlines become
/// spaces, and runs of spaces collapse to one.
pub fn strip_characters(text: &str) -> String {
    let text = SPACE_ENTITY_RE.replace_all(text, " ");
    let text = LINE_BREAK_RE.replace_all(&text, " ");
    SPACES_RE.replace_all(&text, " ").into_owned()
}

pub fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

/// Drops citation markers such as `[4]` or `[citation needed]`.
pub fn strip_brackets(text: &str) -> String {
    BRACKET_RE.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_removed_text_kept() {
        let input = r#"counterfactuals, such as <i>If the moon is made of green cheese, then 2+2=5</i>, which are puzzling because natural language does not support the <a href="/wiki/Principle_of_explosion" title="Principle of explosion">principle of explosion</a>."#;
        assert_eq!(
            strip_tags(input),
            "counterfactuals, such as If the moon is made of green cheese, then 2+2=5, which are puzzling because natural language does not support the principle of explosion."
        );
    }

    #[test]
    fn citation_markers_removed() {
        assert_eq!(
            strip_brackets("cannot be consistent and complete;[4] however,"),
            "cannot be consistent and complete; however,"
        );
    }

    #[test]
    fn space_entity_and_whitespace() {
        assert_eq!(
            strip_characters("by means of \"if&#160;... then&#160;...\", due to"),
            "by means of \"if ;... then ;...\", due to"
        );
        assert_eq!(strip_characters("a\t\tb\n\nc   d"), "a b c d");
    }

    #[test]
    fn full_pass_on_heading_fragment() {
        let input = r#"controversy in <a href="/wiki/Metaphysics" title="Metaphysics">metaphysics</a> on <a href="/wiki/Realism_versus_anti-realism" class="mw-redirect" title="Realism versus anti-realism">realism versus anti-realism</a>.</p> <h3><span class="mw-headline" id="Implication:_Strict_or_material">Implication: Strict or material</span><span class="mw-editsection"><span class="mw-editsection-bracket">[</span><a href="/w/index.php?title=Logic&amp;action=edit&amp;section=21" title="Edit section: Implication: Strict or material">edit</a><span class="mw-editsection-bracket">]</span></span></h3><div role="note" class="hatnote navigation-not-searchable">"#;
        assert_eq!(
            clean_text(input),
            "controversy in metaphysics on realism versus anti-realism. Implication: Strict or material"
        );
    }

    #[test]
    fn idempotent_on_clean_text() {
        let once = clean_text("Logic is <b>the</b> study[1] of\tinference.");
        assert_eq!(once, "Logic is the study of inference.");
        assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn empty_input() {
        assert_eq!(clean_text(""), "");
    }
}
