//! Report template compilation and rendering.
//!
//! A report template is plain text containing zero or more of the
//! two-character tokens `%w` (wall), `%u` (user CPU), `%s` (system CPU),
//! `%t` (total CPU) and `%p` (CPU utilization percent). Everything else
//! passes through verbatim; there is no escaping mechanism for a literal
//! token, and unknown `%x` pairs are ordinary text.
//!
//! Templates are compiled once into a sorted position table and rendered
//! many times against an [`Elapsed`] reading.

/// The metric a template token stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockField {
    /// Wall-clock (real) time.
    Wall,
    /// User-mode CPU time.
    User,
    /// Kernel-mode CPU time.
    System,
    /// Total CPU time (user + system).
    Cpu,
    /// CPU utilization: total CPU over wall, as a percentage.
    Percent,
}

/// One compiled token: where it sits in the template and what it renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatPosition {
    /// Byte offset of the token within the template source.
    pub offset: usize,
    /// The metric rendered at that offset.
    pub field: ClockField,
}

/// Byte length of every recognized token.
const TOKEN_LEN: usize = 2;

const TOKENS: [(&str, ClockField); 5] = [
    ("%w", ClockField::Wall),
    ("%u", ClockField::User),
    ("%s", ClockField::System),
    ("%t", ClockField::Cpu),
    ("%p", ClockField::Percent),
];

/// Accumulated elapsed readings for one timer, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Elapsed {
    /// Wall-clock seconds.
    pub wall: f64,
    /// User-mode CPU seconds.
    pub user: f64,
    /// Kernel-mode CPU seconds.
    pub system: f64,
}

impl Elapsed {
    /// Total CPU seconds (user + system).
    pub fn cpu(&self) -> f64 {
        self.user + self.system
    }

    /// CPU utilization as a percentage of wall time.
    ///
    /// Returns `0.0` when no wall time has elapsed: a report line must never
    /// carry `inf` or `NaN`.
    pub fn utilization(&self) -> f64 {
        if self.wall == 0.0 {
            0.0
        } else {
            self.cpu() / self.wall * 100.0
        }
    }
}

/// A compiled report template.
#[derive(Debug, Clone)]
pub struct ClockFormat {
    source: String,
    positions: Vec<FormatPosition>,
}

impl ClockFormat {
    /// Compile a template.
    ///
    /// Each token kind is scanned for left-to-right; the scan resumes one
    /// byte past a found token's start rather than past its end, so
    /// immediately adjacent matches are still picked up. The collected
    /// positions are then stable-sorted by offset. Compilation never fails:
    /// text that matches no token is literal output.
    pub fn compile(source: impl Into<String>) -> Self {
        let source = source.into();
        let mut positions = Vec::new();
        for (token, field) in TOKENS {
            let mut from = 0;
            while let Some(at) = source[from..].find(token) {
                let offset = from + at;
                positions.push(FormatPosition { offset, field });
                from = offset + 1;
            }
        }
        positions.sort_by_key(|p| p.offset);
        Self { source, positions }
    }

    /// The template text this format was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The compiled position table, sorted ascending by offset.
    pub fn positions(&self) -> &[FormatPosition] {
        &self.positions
    }

    /// Render the template against a reading.
    ///
    /// Duration fields are printed with `precision` fixed decimal digits,
    /// right-justified in a minimum width of `3 + precision` characters, and
    /// scaled by `divisor` (used for per-lap averages). `Percent` ignores
    /// both: it always renders with one decimal digit, unpadded, and is a
    /// ratio the divisor cancels out of.
    ///
    /// Panics if the position table regresses relative to the write cursor;
    /// that can only mean the table was corrupted after compilation.
    pub(crate) fn render(&self, elapsed: &Elapsed, precision: usize, divisor: f64) -> String {
        let width = 3 + precision;
        let mut out = String::with_capacity(self.source.len() + self.positions.len() * width);
        let mut cursor = 0;
        for pos in &self.positions {
            assert!(
                pos.offset >= cursor,
                "format position table regressed: offset {} behind cursor {}",
                pos.offset,
                cursor
            );
            out.push_str(&self.source[cursor..pos.offset]);
            match pos.field {
                ClockField::Wall => {
                    out.push_str(&format!("{:>width$.precision$}", elapsed.wall * divisor))
                }
                ClockField::User => {
                    out.push_str(&format!("{:>width$.precision$}", elapsed.user * divisor))
                }
                ClockField::System => {
                    out.push_str(&format!("{:>width$.precision$}", elapsed.system * divisor))
                }
                ClockField::Cpu => {
                    out.push_str(&format!("{:>width$.precision$}", elapsed.cpu() * divisor))
                }
                ClockField::Percent => out.push_str(&format!("{:.1}", elapsed.utilization())),
            }
            cursor = pos.offset + TOKEN_LEN;
        }
        out.push_str(&self.source[cursor..]);
        out
    }
}
