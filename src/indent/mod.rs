//! The indentation calculator.
//!
//! A prioritized cascade of rules computes the column for the line at the
//! cursor: trust already-present indentation in virtual modes, align
//! closing delimiters with their opener, continue `*`-prefixed comment
//! lines, align line-leading keywords against the construct they belong
//! to, step in after block-opening tokens, and otherwise walk the
//! expression backward to find what to line up with. The first rule that
//! produces a column wins; when none does, the entry point falls back to
//! column 0. Indentation is advisory and never fails.

mod options;
mod rules;

pub use options::IndentOptions;
pub use rules::{AfterRule, IndentRules, Offset};

use crate::engine::Engine;
use crate::host::Host;
use crate::scan::Scan;

/// How far to trust indentation already present in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Virtual {
    /// Compute from scratch.
    #[default]
    None,
    /// Trust the current column when the token starts its line.
    LineStart,
    /// Trust the current column unless the following token hangs.
    Hanging,
}

/// Calculator outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    Column(i32),
    /// Leave the line untouched (rule sentinel).
    Keep,
}

const MAX_RECURSION: u32 = 100;

impl<H: Host> Engine<'_, H> {
    /// Indent the line containing the cursor and reposition it.
    ///
    /// A cursor inside the old indentation ends up at the new
    /// indentation; any other cursor keeps its offset into the line's
    /// content. Internal trouble of any kind degrades to column 0.
    pub fn indent_line(&mut self) -> Indent {
        let origin = self.host.pos();
        let first = self.host.line_indent_end(origin);
        self.host.set_pos(first);
        self.depth = 0;
        let computed = self.calculate(Virtual::None).unwrap_or(Indent::Column(0));
        self.host.set_pos(origin);
        match computed {
            Indent::Keep => Indent::Keep,
            Indent::Column(col) => {
                let col = col.max(0);
                self.host.apply_indent(origin, col as usize);
                Indent::Column(col)
            }
        }
    }

    /// Compute the indentation column for the cursor position without
    /// applying it.
    pub fn indent_calculate(&mut self, virt: Virtual) -> Indent {
        let origin = self.host.pos();
        self.depth = 0;
        let result = self.calculate(virt).unwrap_or(Indent::Column(0));
        self.host.set_pos(origin);
        result
    }

    fn calculate(&mut self, virt: Virtual) -> Option<Indent> {
        if self.depth >= MAX_RECURSION {
            return None;
        }
        self.depth += 1;
        let saved = self.host.pos();
        let result = self
            .trust_existing(virt)
            .or_else(|| {
                self.host.set_pos(saved);
                self.close_delim_indent()
            })
            .or_else(|| {
                self.host.set_pos(saved);
                self.comment_continue_indent()
            })
            .or_else(|| {
                self.host.set_pos(saved);
                self.keyword_indent()
            })
            .or_else(|| {
                self.host.set_pos(saved);
                self.after_keyword_indent(virt)
            })
            .or_else(|| {
                self.host.set_pos(saved);
                self.exps_indent()
            });
        self.host.set_pos(saved);
        self.depth -= 1;
        result
    }

    /// Trust indentation already present, depending on the virtual mode.
    fn trust_existing(&mut self, virt: Virtual) -> Option<Indent> {
        let pos = self.host.pos();
        let trusted = match virt {
            Virtual::None => false,
            Virtual::LineStart => self.host.first_on_line(pos),
            Virtual::Hanging => !self.next_token_hangs(pos),
        };
        trusted.then(|| Indent::Column(self.host.column(pos) as i32))
    }

    /// Does the token following `pos` hang at its line end?
    fn next_token_hangs(&mut self, pos: usize) -> bool {
        let Some(start) = self.host.next_token_start(pos) else {
            return false;
        };
        self.host.set_pos(start);
        let text = self.host.forward_token();
        let end = if text.is_empty() {
            start + self.host.char_at(start).map_or(1, char::len_utf8)
        } else {
            self.host.pos()
        };
        self.host.hanging(start, end)
    }

    /// A line starting with closing delimiters aligns against their
    /// opener.
    fn close_delim_indent(&mut self) -> Option<Indent> {
        let mut p = self.host.pos();
        if !self.host.close_delim(p) {
            return None;
        }
        // hop the whole run of closers, blanks included
        loop {
            let run = p;
            while self.host.close_delim(p) {
                p += 1;
            }
            if p == run {
                break;
            }
            let mut q = p;
            while matches!(self.host.char_at(q), Some(' ') | Some('\t')) {
                q += 1;
            }
            if self.host.close_delim(q) {
                p = q;
            } else {
                break;
            }
        }
        self.host.set_pos(p);
        self.host.backward_group().ok()?;
        self.calculate(Virtual::Hanging)
    }

    /// Continuation lines of a block comment align their leading `*`.
    fn comment_continue_indent(&mut self) -> Option<Indent> {
        let pos = self.host.pos();
        let (start, _) = self.host.comment_span(pos)?;
        if self.host.char_at(pos) != Some('*') {
            return None;
        }
        let line = self.host.line_start(pos);
        if line > start {
            let prev_lead = self.host.line_indent_end(line - 1);
            if prev_lead > start && self.host.char_at(prev_lead) == Some('*') {
                return Some(Indent::Column(self.host.column(prev_lead) as i32));
            }
        }
        Some(Indent::Column(self.host.column(start) as i32 + 1))
    }

    /// A line-leading token with a left level aligns against the
    /// construct that its level ties it to.
    fn keyword_indent(&mut self) -> Option<Indent> {
        let pos = self.host.pos();
        let start = self.host.next_token_start(pos)?;
        if start > self.host.line_end(pos) {
            return None;
        }
        self.host.set_pos(start);
        let token = self.host.forward_token();
        if token.is_empty() {
            return None;
        }
        let left = self.lang.levels.get(&token)?.left?;

        self.host.set_pos(start);
        match self.backward_sexp_expecting(&token) {
            Scan::Operator {
                pos: found,
                token: found_tok,
                ..
            } => {
                if found_tok == token {
                    // chain to the earliest consecutive occurrence
                    let mut earliest = found;
                    loop {
                        self.host.set_pos(earliest);
                        match self.backward_sexp_expecting(&token) {
                            Scan::Operator { pos, token: t, .. }
                                if t == token && pos < earliest =>
                            {
                                earliest = pos;
                            }
                            _ => break,
                        }
                    }
                    self.host.set_pos(earliest);
                    self.calculate(Virtual::LineStart)
                } else if self.sibling_of(&found_tok, left) {
                    self.host.set_pos(found);
                    self.calculate(Virtual::LineStart)
                } else {
                    self.parent_offset_indent(Some(&found_tok), found, &token)
                }
            }
            Scan::Pair {
                pos: found,
                token: found_tok,
            } => {
                if self.sibling_of(&found_tok, left) {
                    self.host.set_pos(found);
                    self.calculate(Virtual::LineStart)
                } else {
                    self.parent_offset_indent(Some(&found_tok), found, &token)
                }
            }
            Scan::Delimiter { pos: found } => self.parent_offset_indent(None, found, &token),
            Scan::Plain => None,
        }
    }

    /// Sibling junction: the found token's right level meets our left
    /// level exactly.
    fn sibling_of(&self, found: &str, left: u16) -> bool {
        self.lang
            .levels
            .get(found)
            .and_then(|lv| lv.right)
            .is_some_and(|right| right == left)
    }

    /// Offset a token against the parent construct it was found under.
    fn parent_offset_indent(
        &mut self,
        parent: Option<&str>,
        at: usize,
        token: &str,
    ) -> Option<Indent> {
        let offset = parent
            .and_then(|p| self.lang.rules.within(p, token))
            .or_else(|| self.lang.rules.within_any(token))
            .unwrap_or(Offset::Cols(0));
        let step = match offset {
            Offset::Keep => return Some(Indent::Keep),
            Offset::Cols(n) => n,
        };
        self.host.set_pos(at);
        match self.calculate(Virtual::LineStart)? {
            Indent::Keep => Some(Indent::Keep),
            Indent::Column(col) => Some(Indent::Column(col + step)),
        }
    }

    /// Step in after a block-opening keyword (or any token with an
    /// `after` rule).
    fn after_keyword_indent(&mut self, virt: Virtual) -> Option<Indent> {
        let prev = self.host.backward_token();
        if prev.is_empty() {
            return None;
        }
        let prev_start = self.host.pos();
        let prev_end = prev_start + prev.len();
        let levels = self.lang.levels.get(&prev);
        let rule = self.lang.rules.after(&prev);
        let opens = levels.is_some_and(|lv| lv.left.is_none());
        if rule.is_none() && !opens {
            return None;
        }
        let hangs = self.host.hanging(prev_start, prev_end);
        let chosen = match rule {
            Some(r) if hangs => r.hanging.unwrap_or(r.offset),
            Some(r) => r.offset,
            None => self.basic_step(),
        };
        let step = match chosen {
            Offset::Keep => return Some(Indent::Keep),
            Offset::Cols(n) => n,
        };
        let base = if hangs || virt != Virtual::None {
            self.host.set_pos(prev_start);
            match self.calculate(Virtual::LineStart)? {
                Indent::Keep => return Some(Indent::Keep),
                Indent::Column(col) => col,
            }
        } else {
            self.host.column(prev_start) as i32
        };
        Some(Indent::Column(base + step))
    }

    /// Walk the expression backward: collect sibling start positions and
    /// decide between call-argument, first-argument and continuation
    /// alignment.
    fn exps_indent(&mut self) -> Option<Indent> {
        let mut positions: Vec<usize> = Vec::new();
        let mut stopped: Option<Scan> = None;
        loop {
            let result = self.backward_sexp(false);
            if result.crossed() {
                positions.push(self.host.pos());
                if self.host.first_on_line(self.host.pos()) {
                    break;
                }
            } else {
                stopped = Some(result);
                break;
            }
        }

        if positions.is_empty() {
            return self.infix_continuation_indent(stopped?);
        }

        // is the leftmost crossed expression an argument, or the function
        // itself?
        let arg = {
            let probe = self.host.pos();
            let result = self.backward_sexp(false);
            let is_arg = if result.crossed() {
                true
            } else {
                let before = self.host.backward_token();
                !before.is_empty() && self.lang.rules.is_list_intro(&before)
            };
            self.host.set_pos(probe);
            is_arg
        };

        let earliest = *positions.last().unwrap();
        if arg {
            return Some(Indent::Column(self.host.column(earliest) as i32));
        }
        if positions.len() >= 2 {
            let first_arg = positions[positions.len() - 2];
            return Some(Indent::Column(self.host.column(first_arg) as i32));
        }
        // we are the first argument, `earliest` is the function
        let step = match self.args_step() {
            Offset::Keep => return Some(Indent::Keep),
            Offset::Cols(n) => n,
        };
        Some(Indent::Column(self.host.column(earliest) as i32 + step))
    }

    /// Continuation right after an infix operator: back over
    /// operand-plus-operator units at the same boundary, then line up
    /// with the leftmost operand.
    fn infix_continuation_indent(&mut self, stop: Scan) -> Option<Indent> {
        let Scan::Operator { level, token, .. } = stop else {
            return None;
        };
        level?;
        loop {
            match self.backward_sexp(true) {
                Scan::Operator {
                    level: l2,
                    token: t2,
                    ..
                } if t2 == token || l2 == level => continue,
                _ => break,
            }
        }
        let start = self.host.next_token_start(self.host.pos())?;
        self.host.set_pos(start);
        self.calculate(Virtual::Hanging)
    }

    fn basic_step(&self) -> Offset {
        self.lang
            .rules
            .basic()
            .unwrap_or(Offset::Cols(self.lang.options.basic))
    }

    fn args_step(&self) -> Offset {
        self.lang
            .rules
            .args()
            .or_else(|| self.lang.rules.basic())
            .unwrap_or(Offset::Cols(self.lang.options.basic))
    }
}
