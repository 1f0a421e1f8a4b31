//! Static advance-width table for the built-in Latin fallback font.
//!
//! Helvetica is one of the PDF standard-14 fonts, so viewers always have it and nothing
//! is embedded. Widths are the Adobe AFM values in 1/1000 em, WinAnsi encoding.
//! The table covers ASCII 0x20..=0x7E (95 printable characters); index = (char as usize) - 32.
//! Anything else is never measured: text is reduced to printable ASCII before it reaches
//! the fallback font.

/// PostScript name of the fallback font.
pub const HELVETICA: &str = "Helvetica";

/// Character-width table for a standard-14 font.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
#[derive(Debug)]
pub struct BuiltinMetrics {
    pub name: &'static str,
    widths: [u16; 95],
}

impl BuiltinMetrics {
    /// Advance of one character in 1/1000 em. Non-ASCII falls back to the `?` width.
    pub fn advance(&self, c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.widths[b'?' as usize - 32]
        }
    }

    /// Width of a whole string in 1/1000 em.
    pub fn measure_units(&self, s: &str) -> f32 {
        s.chars().map(|c| self.advance(c) as f32).sum()
    }
}

pub static HELVETICA_METRICS: BuiltinMetrics = BuiltinMetrics {
    name: HELVETICA,
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
};

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_debug_names_font() {
        let rendered = format!("{:?}", HELVETICA_METRICS);
        assert!(rendered.contains("Helvetica"));
    }

    #[test]
    fn test_measure_empty_is_zero() {
        assert_eq!(HELVETICA_METRICS.measure_units(""), 0.0);
    }

    #[test]
    fn test_measure_ascii_word() {
        // c(500) + a(556) + t(278)
        assert_eq!(HELVETICA_METRICS.measure_units("cat"), 1334.0);
    }

    #[test]
    fn test_non_ascii_measures_as_question_mark() {
        assert_eq!(
            HELVETICA_METRICS.advance('猫'),
            HELVETICA_METRICS.advance('?')
        );
    }

    #[test]
    fn test_table_edges() {
        assert_eq!(HELVETICA_METRICS.advance(' '), 278);
        assert_eq!(HELVETICA_METRICS.advance('~'), 584);
        assert_eq!(HELVETICA_METRICS.advance('W'), 944);
    }
}
