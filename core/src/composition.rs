//! Preedit composition and its decoration for display.
//!
//! The engine reports the preedit as a character sequence where every
//! character carries a set of type bits. The decorator turns those bits into
//! contiguous spans that the host renders with foreground colors. Offsets are
//! character offsets, matching how the host addresses preedit text.

use std::ops::Range;

bitflags::bitflags! {
    /// Classification bits for a single preedit character.
    ///
    /// A character may carry several bits at once.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CharType: u32 {
        /// Chosen explicitly by the user from a candidate list
        const USER_CHOICE = 1 << 0;
        /// Input the engine cannot decode
        const ILLEGAL     = 1 << 1;
    }
}

/// Foreground color for illegal input.
pub const ILLEGAL_COLOR: u32 = 0xE76F00;
/// Foreground color for user-chosen text.
pub const USER_CHOICE_COLOR: u32 = 0x35556B;

/// Preedit as reported by the engine session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Preedit {
    /// Characters being composed
    pub chars: Vec<char>,
    /// Type bits, one entry per character; missing entries read as empty
    pub types: Vec<CharType>,
    /// Caret position (character offset)
    pub caret: usize,
}

impl Preedit {
    /// Create a preedit with untyped characters and the caret at the end.
    pub fn from_text(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let caret = chars.len();
        Self {
            types: vec![CharType::empty(); chars.len()],
            chars,
            caret,
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn type_at(&self, index: usize) -> CharType {
        self.types.get(index).copied().unwrap_or_default()
    }

    /// Mark `range` with `ty` in addition to its existing bits.
    pub fn mark(&mut self, range: Range<usize>, ty: CharType) {
        if self.types.len() < self.chars.len() {
            self.types.resize(self.chars.len(), CharType::empty());
        }
        let end = range.end.min(self.types.len());
        for t in &mut self.types[range.start.min(end)..end] {
            t.insert(ty);
        }
    }
}

/// Classification of a decorated span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanClass {
    Normal,
    UserChoice,
    Illegal,
}

impl SpanClass {
    /// Foreground color, `None` for unstyled text.
    pub fn color(self) -> Option<u32> {
        match self {
            Self::Normal => None,
            Self::UserChoice => Some(USER_CHOICE_COLOR),
            Self::Illegal => Some(ILLEGAL_COLOR),
        }
    }
}

/// A maximal run of identically classified preedit characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreeditSpan {
    pub range: Range<usize>,
    pub class: SpanClass,
}

impl PreeditSpan {
    pub fn color(&self) -> Option<u32> {
        self.class.color()
    }
}

/// Length of the run starting at `begin` whose characters all satisfy `pred`.
fn run_len(
    begin: usize,
    len: usize,
    type_of: &impl Fn(usize) -> CharType,
    pred: impl Fn(CharType) -> bool,
) -> usize {
    (begin..len).take_while(|&i| pred(type_of(i))).count()
}

/// Split `[0, len)` into classified spans.
///
/// At every position an ILLEGAL run is tried before a USER_CHOICE run, and a
/// USER_CHOICE run stops at the first ILLEGAL character, so a character
/// carrying both bits is always ILLEGAL. Positions matching
/// neither are NORMAL; consecutive NORMAL positions are merged. The result
/// partitions `[0, len)` in order with no empty spans.
pub fn decorate(len: usize, type_of: impl Fn(usize) -> CharType) -> Vec<PreeditSpan> {
    let mut spans: Vec<PreeditSpan> = Vec::new();
    let mut push = |range: Range<usize>, class: SpanClass| match spans.last_mut() {
        Some(last) if last.class == class && last.range.end == range.start => {
            last.range.end = range.end;
        }
        _ => spans.push(PreeditSpan { range, class }),
    };

    let mut i = 0;
    while i < len {
        let n = run_len(i, len, &type_of, |t| t.contains(CharType::ILLEGAL));
        if n > 0 {
            push(i..i + n, SpanClass::Illegal);
            i += n;
            continue;
        }
        let n = run_len(i, len, &type_of, |t| {
            t.contains(CharType::USER_CHOICE) && !t.contains(CharType::ILLEGAL)
        });
        if n > 0 {
            push(i..i + n, SpanClass::UserChoice);
            i += n;
            continue;
        }
        push(i..i + 1, SpanClass::Normal);
        i += 1;
    }
    spans
}

/// Preedit ready for the host: text, decoration and caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreeditText {
    pub text: String,
    pub spans: Vec<PreeditSpan>,
    /// Caret position (character offset)
    pub caret: usize,
    pub visible: bool,
}

impl PreeditText {
    /// Decorate an engine preedit. Returns `None` for an empty preedit,
    /// which the host must hide rather than render.
    ///
    /// A caret inside the text is passed to the host's native caret; no
    /// caret glyph is drawn into the text.
    pub fn from_preedit(preedit: &Preedit) -> Option<Self> {
        if preedit.is_empty() {
            return None;
        }
        Some(Self {
            text: preedit.text(),
            spans: decorate(preedit.len(), |i| preedit.type_at(i)),
            caret: preedit.caret.min(preedit.len()),
            visible: true,
        })
    }

    /// Spans that need a foreground color attribute.
    pub fn styled_spans(&self) -> impl Iterator<Item = (&PreeditSpan, u32)> {
        self.spans
            .iter()
            .filter_map(|span| span.color().map(|color| (span, color)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const N: CharType = CharType::empty();
    const U: CharType = CharType::USER_CHOICE;
    const I: CharType = CharType::ILLEGAL;

    fn spans_of(types: &[CharType]) -> Vec<(Range<usize>, SpanClass)> {
        decorate(types.len(), |i| types[i])
            .into_iter()
            .map(|s| (s.range, s.class))
            .collect()
    }

    #[test]
    fn test_empty_preedit_has_no_spans() {
        assert!(decorate(0, |_| N).is_empty());
        assert_eq!(PreeditText::from_preedit(&Preedit::default()), None);
    }

    #[test]
    fn test_plain_text_is_one_normal_span() {
        assert_eq!(spans_of(&[N, N, N]), vec![(0..3, SpanClass::Normal)]);
    }

    #[test]
    fn test_mixed_runs() {
        assert_eq!(
            spans_of(&[U, U, N, I, I, N, U]),
            vec![
                (0..2, SpanClass::UserChoice),
                (2..3, SpanClass::Normal),
                (3..5, SpanClass::Illegal),
                (5..6, SpanClass::Normal),
                (6..7, SpanClass::UserChoice),
            ]
        );
    }

    #[test]
    fn test_illegal_wins_over_user_choice() {
        let both = U | I;
        assert_eq!(spans_of(&[both]), vec![(0..1, SpanClass::Illegal)]);
        // the shared character extends the illegal run
        assert_eq!(
            spans_of(&[I, both, U]),
            vec![(0..2, SpanClass::Illegal), (2..3, SpanClass::UserChoice)]
        );
        // a user-choice run does not swallow an illegal character
        assert_eq!(
            spans_of(&[U, both, U]),
            vec![
                (0..1, SpanClass::UserChoice),
                (1..2, SpanClass::Illegal),
                (2..3, SpanClass::UserChoice),
            ]
        );
    }

    #[test]
    fn test_styled_spans_skip_normal() {
        let mut preedit = Preedit::from_text("你好ni");
        preedit.mark(0..2, CharType::USER_CHOICE);
        let text = PreeditText::from_preedit(&preedit).unwrap();
        let styled: Vec<_> = text.styled_spans().map(|(s, c)| (s.range.clone(), c)).collect();
        assert_eq!(styled, vec![(0..2, USER_CHOICE_COLOR)]);
        assert_eq!(text.caret, 4);
        assert!(text.visible);
    }

    #[test]
    fn test_caret_clamped_to_length() {
        let mut preedit = Preedit::from_text("ab");
        preedit.caret = 9;
        assert_eq!(PreeditText::from_preedit(&preedit).unwrap().caret, 2);
    }

    #[test]
    fn test_missing_types_read_as_normal() {
        let preedit = Preedit {
            chars: vec!['a', 'b'],
            types: vec![CharType::ILLEGAL],
            caret: 2,
        };
        let text = PreeditText::from_preedit(&preedit).unwrap();
        assert_eq!(text.spans.len(), 2);
        assert_eq!(text.spans[1].class, SpanClass::Normal);
    }

    fn arb_type() -> impl Strategy<Value = CharType> {
        prop_oneof![Just(N), Just(U), Just(I), Just(U | I)]
    }

    proptest! {
        #[test]
        fn spans_partition_input(types in prop::collection::vec(arb_type(), 0..40)) {
            let spans = decorate(types.len(), |i| types[i]);
            let mut next = 0;
            for span in &spans {
                prop_assert_eq!(span.range.start, next);
                prop_assert!(span.range.end > span.range.start);
                next = span.range.end;
            }
            prop_assert_eq!(next, types.len());
            for pair in spans.windows(2) {
                prop_assert_ne!(pair[0].class, pair[1].class);
            }
        }

        #[test]
        fn illegal_bit_always_wins(types in prop::collection::vec(arb_type(), 1..40)) {
            let spans = decorate(types.len(), |i| types[i]);
            for span in &spans {
                for i in span.range.clone() {
                    if types[i].contains(I) {
                        prop_assert_eq!(span.class, SpanClass::Illegal);
                    }
                }
            }
        }
    }
}
