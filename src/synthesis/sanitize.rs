/// Strip what should not be read aloud: emoji, pictographs, dingbats and
/// markdown emphasis markers. Whitespace is collapsed.
pub fn sanitize_for_speech(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !is_markup(*c))
        .map(|c| if is_decorative(c) { ' ' } else { c })
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_markup(c: char) -> bool {
    matches!(c, '*' | '_' | '#' | '`' | '~' | '|' | '>')
}

fn is_decorative(c: char) -> bool {
    matches!(c,
        // Variation selectors and zero-width joiner used to compose emoji
        '\u{FE00}'..='\u{FE0F}'
        | '\u{200D}'
        | '\u{20E3}'
        // Arrows, technical and geometric symbols, dingbats
        | '\u{2190}'..='\u{21FF}'
        | '\u{2300}'..='\u{23FF}'
        | '\u{2500}'..='\u{27BF}'
        | '\u{2B00}'..='\u{2BFF}'
        // Emoji and pictograph blocks, flags, skin tones
        | '\u{1F000}'..='\u{1FAFF}'
        | '\u{E0020}'..='\u{E007F}'
    )
}
