//! An execution plan, the compiler's output: the primary statement and,
//! when a count was requested, a secondary count statement.

use super::ast;
use super::convert;
use super::string;

/// The AST-level result of compiling a validated query.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionPlan {
    pub query: ast::Select,
    /// Present when the request asked for the size of the filtered
    /// population alongside the page.
    pub count: Option<ast::Select>,
}

impl ExecutionPlan {
    /// Render the primary statement.
    pub fn query_sql(&self) -> string::SQL {
        convert::select_to_sql(&self.query)
    }

    /// Render the count statement, if one is needed.
    pub fn count_sql(&self) -> Option<string::SQL> {
        self.count.as_ref().map(convert::select_to_sql)
    }

    /// Render the whole plan to the form handed to the data-access layer.
    pub fn compile(&self) -> CompiledStatement {
        CompiledStatement {
            query: self.query_sql(),
            count: self.count_sql(),
        }
    }
}

/// Parameterized SQL text plus ordered bind values, ready to be executed by
/// a separate data-access layer. Placeholders are numbered per statement, so
/// the count statement's parameters restart at `$1`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStatement {
    pub query: string::SQL,
    pub count: Option<string::SQL>,
}

impl CompiledStatement {
    /// Whether a separate COUNT statement must also be issued.
    pub fn requires_count(&self) -> bool {
        self.count.is_some()
    }
}
