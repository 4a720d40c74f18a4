//! Bidirectional operator-precedence scanning.
//!
//! One algorithm serves both directions. Scanning toward a token reaches
//! its *near* side first (backward: the right level, forward: the left
//! level); the *far* side faces where the scan is headed. The scanner
//! keeps a stack of far levels for the constructs it is inside of and
//! stops when the next token binds looser than the stack expects. It
//! never fails: unknown tokens are atoms, delimiter trouble becomes a
//! [`Scan::Delimiter`] result, ill-formed table entries are crossed
//! silently.

use crate::engine::Engine;
use crate::grammar::OpLevels;
use crate::host::Host;

/// Outcome of skipping one sub-expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scan {
    /// Crossed an atom or a fully matched delimiter group.
    Plain,
    /// Stopped in front of an operator binding looser than the pending
    /// stack. `level` is the operator's far-side level (`None` when that
    /// side is open); `pos` is where the operator starts (backward) or
    /// ends (forward); the cursor is rewound to the near side.
    Operator {
        level: Option<u16>,
        pos: usize,
        token: String,
    },
    /// Hit an unmatched delimiter or a buffer edge at `pos`.
    Delimiter { pos: usize },
    /// Stepped across one paren-like construct; the cursor rests on the
    /// reported boundary token.
    Pair { pos: usize, token: String },
}

impl Scan {
    /// True for results that crossed something and allow scanning on.
    pub fn crossed(&self) -> bool {
        matches!(self, Scan::Plain | Scan::Pair { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dir {
    Forward,
    Backward,
}

impl Dir {
    fn near(self, levels: OpLevels) -> Option<u16> {
        match self {
            Dir::Backward => levels.right,
            Dir::Forward => levels.left,
        }
    }

    fn far(self, levels: OpLevels) -> Option<u16> {
        match self {
            Dir::Backward => levels.left,
            Dir::Forward => levels.right,
        }
    }
}

impl<H: Host> Engine<'_, H> {
    /// Skip backward over one sub-expression.
    ///
    /// With `halfsexp` the scan may start on an operator and consume its
    /// left operand; the flag disarms after the first consumed token.
    pub fn backward_sexp(&mut self, halfsexp: bool) -> Scan {
        self.scan(Dir::Backward, halfsexp, None)
    }

    /// Skip forward over one sub-expression; mirror of [`backward_sexp`].
    ///
    /// [`backward_sexp`]: Engine::backward_sexp
    pub fn forward_sexp(&mut self, halfsexp: bool) -> Scan {
        self.scan(Dir::Forward, halfsexp, None)
    }

    /// Scan backward as if a pending `token` had just been read: the
    /// stack starts out expecting its construct. This is how the
    /// calculator finds the parent of a line-leading keyword.
    pub(crate) fn backward_sexp_expecting(&mut self, token: &str) -> Scan {
        let seed = self.lang.levels.get(token);
        self.scan(Dir::Backward, false, seed)
    }

    fn scan(&mut self, dir: Dir, halfsexp: bool, seed: Option<OpLevels>) -> Scan {
        let mut armed = halfsexp;
        let mut stack: Vec<u16> = Vec::new();
        if let Some(far) = seed.and_then(|lv| dir.far(lv)) {
            stack.push(far);
        }

        loop {
            let pre = self.host.pos();
            let text = match dir {
                Dir::Backward => self.host.backward_token(),
                Dir::Forward => self.host.forward_token(),
            };
            let tok_pos = self.host.pos();

            match self.lang.levels.get(&text) {
                None if text.is_empty() => {
                    let skipped = match dir {
                        Dir::Backward => self.host.backward_group(),
                        Dir::Forward => self.host.forward_group(),
                    };
                    match skipped {
                        Err(stop) => return Scan::Delimiter { pos: stop.pos },
                        Ok(()) if self.host.pos() == pre => {
                            return Scan::Delimiter { pos: pre };
                        }
                        Ok(()) => {}
                    }
                }
                None => {} // plain atom, crossed
                Some(levels) => {
                    let far = dir.far(levels);
                    match dir.near(levels) {
                        None => match far {
                            // closer-like for this direction
                            Some(far) => stack.push(far),
                            None => {
                                tracing::trace!(token = %text, "token with no levels, crossing as atom");
                            }
                        },
                        Some(near) => {
                            while stack.last().is_some_and(|&top| near < top) {
                                stack.pop();
                            }
                            if stack.is_empty() {
                                match far {
                                    Some(far) if armed => stack.push(far),
                                    _ => {
                                        self.host.set_pos(pre);
                                        return Scan::Operator {
                                            level: far,
                                            pos: tok_pos,
                                            token: text,
                                        };
                                    }
                                }
                            } else {
                                let matched = stack.last() == Some(&near);
                                if matched {
                                    stack.pop();
                                }
                                if stack.is_empty() && matched {
                                    match far {
                                        None => {
                                            return Scan::Pair {
                                                pos: tok_pos,
                                                token: text,
                                            }
                                        }
                                        Some(far_level) if far_level == near => {
                                            // associative junction
                                            self.host.set_pos(pre);
                                            return Scan::Operator {
                                                level: far,
                                                pos: tok_pos,
                                                token: text,
                                            };
                                        }
                                        Some(far_level) => {
                                            // inner keyword of a larger
                                            // construct, keep scanning
                                            stack.push(far_level);
                                        }
                                    }
                                } else if let Some(far_level) = far {
                                    stack.push(far_level);
                                }
                            }
                        }
                    }
                }
            }

            armed = false;
            if stack.is_empty() {
                return Scan::Plain;
            }
        }
    }
}
