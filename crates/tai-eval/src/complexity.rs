//! Static cost factor from loop nesting.
//!
//! Each loop adds its own nesting depth: a top-level loop adds 1, a loop
//! inside it adds 2, and so on. Loops inside conditional branches count at
//! the depth of the enclosing loop.

use tai_types::ast::Stmt;

/// Cost factor of a statement list.
pub fn cost_factor(stmts: &[Stmt]) -> u64 {
    let mut total = 0;
    walk(stmts, 0, &mut total);
    total
}

fn walk(stmts: &[Stmt], depth: u64, total: &mut u64) {
    for stmt in stmts {
        match stmt {
            Stmt::Loop(l) => {
                *total += depth + 1;
                walk(&l.body.stmts, depth + 1, total);
            }
            Stmt::If(i) => {
                walk(&i.then_block.stmts, depth, total);
                if let Some(else_block) = &i.else_block {
                    walk(&else_block.stmts, depth, total);
                }
            }
            _ => {}
        }
    }
}
