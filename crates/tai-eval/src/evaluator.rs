//! Core statement and expression evaluator.

use tai_types::ast::*;

use crate::bribe::BribeManager;
use crate::complexity::cost_factor;
use crate::config::InterpreterConfig;
use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::input::InputSource;
use crate::value::{format_number, Value};

/// The TaiScript interpreter. Owns all run state, so separate instances
/// never interfere.
pub struct Interpreter {
    env: Environment,
    bribe: BribeManager,
    config: InterpreterConfig,
    input: Box<dyn InputSource>,
    /// Output log. `isi line pe` appends to the last entry.
    output: Vec<String>,
    /// Whether the last entry came from `ghoshna` and may be continued.
    line_open: bool,
}

impl Interpreter {
    pub fn new(config: InterpreterConfig, input: Box<dyn InputSource>) -> Self {
        Self {
            env: Environment::new(),
            bribe: BribeManager::new(config.bribe.clone()),
            config,
            input,
            output: Vec::new(),
            line_open: false,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn bribe(&self) -> &BribeManager {
        &self.bribe
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// The output log as printed text, one entry per line.
    pub fn output_text(&self) -> String {
        self.output.join("\n")
    }

    /// Compute the program's cost factor and hand it to the bribe manager.
    pub fn assess(&mut self, program: &Program) -> u64 {
        let factor = cost_factor(&program.stmts);
        self.bribe.assess(factor);
        factor
    }

    /// Assess and run a program.
    ///
    /// A runtime error stops the run and is appended to the output log as
    /// `Runtime Error: <message>`. Output produced before the error is kept
    /// and files already written stay written. Files still open at the end
    /// are flushed and closed either way.
    #[tracing::instrument(skip_all, fields(program = program.name().unwrap_or("<unnamed>")))]
    pub fn interpret(&mut self, program: &Program) -> EvalResult<()> {
        self.assess(program);
        let result = match self.exec_stmts(&program.stmts) {
            Err(EvalError::Return) => {
                tracing::debug!("program returned early");
                Ok(())
            }
            other => other,
        };
        let result = result.and(self.env.close_all());
        if let Err(err) = &result {
            tracing::warn!(error = %err, "run aborted");
            self.note(format!("Runtime Error: {err}"));
        }
        result
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    fn exec_stmts(&mut self, stmts: &[Stmt]) -> EvalResult<()> {
        for stmt in stmts {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<()> {
        tracing::trace!(kind = stmt.kind_name(), line = stmt.span().line, "exec");
        if is_gated(stmt) {
            self.bribe.authorize_statement()?;
            self.emit_commentary();
        }
        match stmt {
            Stmt::ProgramStart(_) | Stmt::ProgramEnd(_) => Ok(()),
            Stmt::VarDecl(decl) => {
                let value = match &decl.value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Empty,
                };
                self.env.define(&decl.name.name, value);
                Ok(())
            }
            Stmt::Print(print) => {
                let text = self.eval_expr(&print.value)?.to_string();
                self.emit(text, print.newline);
                Ok(())
            }
            Stmt::If(stmt) => self.exec_if(stmt),
            Stmt::Loop(stmt) => self.exec_loop(stmt),
            Stmt::StructDecl(decl) => {
                let fields = decl.fields.iter().map(|f| f.name.clone()).collect();
                self.env.define_struct(&decl.name.name, fields);
                Ok(())
            }
            Stmt::StructInstance(inst) => {
                let value = self.env.instantiate(&inst.struct_type.name)?;
                self.env.define(&inst.name.name, value);
                Ok(())
            }
            Stmt::FileOpen(open) => self.env.open_file(&open.alias.name, &open.path),
            Stmt::FileClose(close) => self.env.close_file(&close.alias.name),
            Stmt::FileWrite(write) => {
                let text = self.eval_expr(&write.value)?.to_string();
                self.env.write_file(&write.alias.name, &text, write.newline)
            }
            Stmt::Input(input) => {
                let value = self.read_input()?;
                self.env.define(&input.name.name, value);
                Ok(())
            }
            Stmt::Profile(profile) => {
                self.bribe.set_profile(&profile.profile)?;
                Ok(())
            }
            Stmt::Payment(payment) => {
                let total = self.bribe.collect(payment.amount);
                if self.config.commentary {
                    self.note(format!("Bribe collected so far: {}", format_number(total)));
                }
                Ok(())
            }
            Stmt::Break(_) => {
                if self.bribe.depth() == 0 {
                    Err(EvalError::BreakOutsideLoop)
                } else {
                    Err(EvalError::Break)
                }
            }
            Stmt::Return(_) => Err(EvalError::Return),
        }
    }

    fn exec_if(&mut self, stmt: &IfStmt) -> EvalResult<()> {
        let holds = match self.eval_expr(&stmt.condition)? {
            Value::Bool(b) => b,
            other => {
                return Err(EvalError::TypeMismatch(format!(
                    "condition must be a comparison, got {}",
                    other.type_name()
                )))
            }
        };
        if holds {
            if stmt.then_block.stmts.is_empty() {
                return Err(EvalError::MissingBranch);
            }
            self.exec_stmts(&stmt.then_block.stmts)
        } else if let Some(else_block) = &stmt.else_block {
            self.exec_stmts(&else_block.stmts)
        } else {
            Ok(())
        }
    }

    fn exec_loop(&mut self, stmt: &LoopStmt) -> EvalResult<()> {
        self.bribe.enter_loop()?;
        self.emit_commentary();
        let result = self.run_loop(stmt);
        self.bribe.exit_loop();
        result
    }

    fn run_loop(&mut self, stmt: &LoopStmt) -> EvalResult<()> {
        let name = &stmt.variable.name;
        let start = self.loop_bound(&stmt.start, "start")?;
        let end = self.loop_bound(&stmt.end, "end")?;
        let step = self.loop_bound(&stmt.step, "step")?;
        tracing::debug!(
            variable = %name,
            start,
            end,
            step,
            depth = self.bribe.depth(),
            "entering loop"
        );

        self.env.define(name, Value::Number(start));
        let mut iterations: u64 = 0;
        loop {
            // Re-read every time: the body may reassign the variable.
            let current = self.loop_variable(name)?;
            let proceed = if step > 0.0 {
                current <= end
            } else {
                current >= end
            };
            if !proceed {
                break;
            }
            if let Some(limit) = self.config.loop_iteration_limit {
                if iterations >= limit {
                    return Err(EvalError::LoopLimit { limit });
                }
            }
            iterations += 1;
            match self.exec_stmts(&stmt.body.stmts) {
                Ok(()) => {}
                Err(EvalError::Break) => break,
                Err(e) => return Err(e),
            }
            let current = self.loop_variable(name)?;
            self.env.define(name, Value::Number(current + step));
        }
        tracing::debug!(variable = %name, iterations, "loop finished");
        Ok(())
    }

    fn loop_bound(&self, expr: &Expr, what: &str) -> EvalResult<f64> {
        match self.eval_expr(expr)? {
            Value::Number(n) if n.fract() == 0.0 => Ok(n),
            other => Err(EvalError::LoopBound(format!("{what} is {other}"))),
        }
    }

    fn loop_variable(&self, name: &str) -> EvalResult<f64> {
        self.env.get(name)?.as_number().ok_or_else(|| {
            EvalError::TypeMismatch(format!("loop variable '{name}' no longer holds a number"))
        })
    }

    fn read_input(&mut self) -> EvalResult<Value> {
        let line = self
            .input
            .read_line()
            .map_err(|e| EvalError::Input(e.to_string()))?;
        Ok(match line {
            None => Value::Str(String::new()),
            Some(line) => match line.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Value::Number(n),
                _ => Value::Str(line),
            },
        })
    }

    /// Append printed text to the output log, continuing the last printed
    /// entry when `newline` is false.
    fn emit(&mut self, text: String, newline: bool) {
        match self.output.last_mut() {
            Some(last) if !newline && self.line_open => last.push_str(&text),
            _ => self.output.push(text),
        }
        self.line_open = true;
    }

    /// Append a line of its own that prints never continue.
    fn note(&mut self, line: String) {
        self.output.push(line);
        self.line_open = false;
    }

    fn emit_commentary(&mut self) {
        if !self.config.commentary {
            return;
        }
        if let Some(line) = self.bribe.take_commentary() {
            self.note(line);
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a Value.
    pub fn eval_expr(&self, expr: &Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::NumberLit(n) => Ok(Value::Number(*n)),
            ExprKind::StringLit(raw) => self.interpolate(raw).map(Value::Str),
            ExprKind::Identifier(name) => self.env.get(name).cloned(),
            ExprKind::Binary { left, op, right } => {
                let lv = self.eval_expr(left)?;
                let rv = self.eval_expr(right)?;
                eval_binary(*op, &lv, &rv)
            }
            ExprKind::Comparison { left, op, right } => {
                let lv = self.eval_expr(left)?;
                let rv = self.eval_expr(right)?;
                eval_comparison(*op, &lv, &rv)
            }
        }
    }

    /// Replace every `{name}` with the current value of `name`. Braces that
    /// do not enclose an identifier are kept as written.
    fn interpolate(&self, raw: &str) -> EvalResult<String> {
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) if is_identifier(&after[..close]) => {
                    out.push_str(&self.env.get(&after[..close])?.to_string());
                    rest = &after[close + 1..];
                }
                _ => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// Statements outside this set need the bribe manager's approval.
fn is_gated(stmt: &Stmt) -> bool {
    !matches!(
        stmt,
        Stmt::Profile(_)
            | Stmt::Payment(_)
            | Stmt::ProgramStart(_)
            | Stmt::ProgramEnd(_)
            | Stmt::Input(_)
            // Loops are authorized on entry instead.
            | Stmt::Loop(_)
    )
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ── Operators ────────────────────────────────────────────────────────────

fn eval_binary(op: BinOp, lv: &Value, rv: &Value) -> EvalResult<Value> {
    if op == BinOp::Add {
        return match (lv, rv) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::Str(_), _) | (_, Value::Str(_)) => Ok(Value::Str(format!("{lv}{rv}"))),
            _ => Err(mismatch(op, lv, rv)),
        };
    }
    let (Value::Number(a), Value::Number(b)) = (lv, rv) else {
        return Err(mismatch(op, lv, rv));
    };
    let (a, b) = (*a, *b);
    match op {
        BinOp::Sub => Ok(Value::Number(a - b)),
        BinOp::Mul => Ok(Value::Number(a * b)),
        BinOp::Div if b == 0.0 => Err(EvalError::DivisionByZero),
        BinOp::Div => Ok(Value::Number(a / b)),
        BinOp::Rem if b == 0.0 => Err(EvalError::ModuloByZero),
        BinOp::Rem => {
            // The result takes the sign of the divisor.
            let r = a % b;
            if r != 0.0 && (r < 0.0) != (b < 0.0) {
                Ok(Value::Number(r + b))
            } else {
                Ok(Value::Number(r))
            }
        }
        BinOp::Add => unreachable!("handled above"),
    }
}

fn eval_comparison(op: CmpOp, lv: &Value, rv: &Value) -> EvalResult<Value> {
    let ordering = match op {
        CmpOp::Eq => return Ok(Value::Bool(lv == rv)),
        CmpOp::NotEq => return Ok(Value::Bool(lv != rv)),
        _ => match (lv, rv) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            _ => {
                return Err(EvalError::TypeMismatch(format!(
                    "cannot compare {} and {} with '{op}'",
                    lv.type_name(),
                    rv.type_name()
                )))
            }
        },
    };
    let holds = ordering.is_some_and(|ord| match op {
        CmpOp::Greater => ord.is_gt(),
        CmpOp::Less => ord.is_lt(),
        CmpOp::GreaterEq => ord.is_ge(),
        CmpOp::LessEq => ord.is_le(),
        CmpOp::Eq | CmpOp::NotEq => unreachable!("handled above"),
    });
    Ok(Value::Bool(holds))
}

fn mismatch(op: BinOp, lv: &Value, rv: &Value) -> EvalError {
    EvalError::TypeMismatch(format!(
        "cannot apply '{op}' to {} and {}",
        lv.type_name(),
        rv.type_name()
    ))
}
