/// Appended so the last real sentence always has a boundary after it.
const SENTINEL: &str = " A";

const PUNCTUATION: &[char] = &[',', '(', ')', '.', '!', '?'];

fn is_terminator(b: u8) -> bool {
    matches!(b, b'.' | b'!' | b'?')
}

/// Split cleaned text into sentences.
///
/// A boundary is a terminator, an optional `)`, then one space, where the next
/// character (after an optional `(`) is an uppercase ASCII letter. The space is
/// consumed; everything else stays with its sentence. A trailing fragment with
/// no boundary after it is dropped.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    let padded = format!("{text}{SENTINEL}");
    let bytes = padded.as_bytes();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if is_terminator(bytes[i]) {
            if let Some(end) = boundary_after(bytes, i) {
                sentences.push(padded[start..end].to_string());
                start = end + 1;
                i = start;
                continue;
            }
        }
        i += 1;
    }

    sentences
}

/// End offset (exclusive, before the separating space) of a sentence whose
/// terminator sits at `i`, if the text after it opens a new sentence.
fn boundary_after(bytes: &[u8], i: usize) -> Option<usize> {
    let mut end = i + 1;
    if bytes.get(end) == Some(&b')') && opens_sentence(bytes, end + 1) {
        end += 1;
    } else if !opens_sentence(bytes, end) {
        return None;
    }
    Some(end)
}

fn opens_sentence(bytes: &[u8], space: usize) -> bool {
    if bytes.get(space) != Some(&b' ') {
        return false;
    }
    let mut next = space + 1;
    if bytes.get(next) == Some(&b'(') {
        next += 1;
    }
    bytes.get(next).is_some_and(u8::is_ascii_uppercase)
}

/// Split one sentence into words and punctuation tokens. Only literal spaces
/// separate words; `, ( ) . ! ?` are always tokens of their own.
pub fn split_into_words(sentence: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for segment in sentence.split(' ') {
        let mut rest = segment;
        while let Some(pos) = rest.find(PUNCTUATION) {
            if pos > 0 {
                tokens.push(rest[..pos].to_string());
            }
            tokens.push(rest[pos..pos + 1].to_string());
            rest = &rest[pos + 1..];
        }
        if !rest.is_empty() {
            tokens.push(rest.to_string());
        }
    }
    tokens
}

pub fn split_text(text: &str) -> Vec<Vec<String>> {
    split_into_sentences(text)
        .iter()
        .map(|sentence| split_into_words(sentence))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Vec<String> {
        split_into_sentences(text)
    }

    #[test]
    fn sentences_basic() {
        assert_eq!(s("A b c. D e f. G h i."), ["A b c.", "D e f.", "G h i."]);
        assert_eq!(s("A b c! D e f! G h i!"), ["A b c!", "D e f!", "G h i!"]);
        assert_eq!(s("A b c? D e f? G h i?"), ["A b c?", "D e f?", "G h i?"]);
        assert_eq!(s("A b c. D e f? G h i!"), ["A b c.", "D e f?", "G h i!"]);
    }

    #[test]
    fn sentences_with_parentheses() {
        assert_eq!(
            s("Abc def. Ghi (jkl.) Mno pqr."),
            ["Abc def.", "Ghi (jkl.)", "Mno pqr."]
        );
        assert_eq!(s("Abc def. (Ghi jkl.) Mno."), ["Abc def.", "(Ghi jkl.)", "Mno."]);
        assert_eq!(s("Abc (def. Ghi) jkl."), ["Abc (def.", "Ghi) jkl."]);
    }

    #[test]
    fn lowercase_continuation_does_not_split() {
        assert_eq!(
            s("Born c. 384 BC. He died in 322 BC. e.g. this one."),
            ["Born c. 384 BC.", "He died in 322 BC. e.g. this one."]
        );
    }

    #[test]
    fn terminator_without_space_does_not_split() {
        assert_eq!(
            s("Version 2.0 is out. Next is 3.14 soon."),
            ["Version 2.0 is out.", "Next is 3.14 soon."]
        );
    }

    #[test]
    fn trailing_fragment_dropped() {
        assert_eq!(s("First one. Second has no end"), ["First one."]);
        assert!(s("No terminator at all").is_empty());
        assert!(s("").is_empty());
    }

    #[test]
    fn non_ascii_text() {
        assert_eq!(
            s("Logic (λογική) is old. Études follow."),
            ["Logic (λογική) is old. Études follow."]
        );
        assert_eq!(s("Λόγος. Greek word. Done."), ["Λόγος.", "Greek word.", "Done."]);
    }

    #[test]
    fn terminators_preserved() {
        let text = "A b. C d! (E f?) G h. I j.) K l.";
        let count = |t: &str| t.chars().filter(|c| matches!(c, '.' | '!' | '?')).count();
        let joined = s(text).join(" ");
        assert_eq!(joined, text);
        assert_eq!(count(&joined), count(text));
    }

    #[test]
    fn words_basic() {
        assert_eq!(split_into_words("(A b) c."), ["(", "A", "b", ")", "c", "."]);
        assert_eq!(
            split_into_words("Hello, world! (Really?)"),
            ["Hello", ",", "world", "!", "(", "Really", "?", ")"]
        );
    }

    #[test]
    fn words_keep_other_symbols() {
        assert_eq!(
            split_into_words("2+2=5; \"if ;... then\""),
            ["2+2=5;", "\"if", ";", ".", ".", ".", "then\""]
        );
    }

    #[test]
    fn words_never_empty() {
        let sentence = "  a  ,, (b)  ";
        let words = split_into_words(sentence);
        assert!(words.iter().all(|w| !w.is_empty()));
        assert_eq!(words.concat(), sentence.replace(' ', ""));
    }

    #[test]
    fn text_to_tokens() {
        assert_eq!(
            split_text("Logic is old. (It is.) Fine!"),
            vec![
                vec!["Logic", "is", "old", "."],
                vec!["(", "It", "is", ".", ")"],
                vec!["Fine", "!"],
            ]
        );
    }
}
