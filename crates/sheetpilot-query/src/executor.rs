//! Connection-scoped statement execution

use std::path::Path;

use sheetpilot_core::{DataSourceHandle, Table};

use crate::address::{SheetAddress, Statement};
use crate::error::Result;

/// A live, single-use connection to an opened tabular data source.
///
/// A connection is owned exclusively by the executor for the duration of one
/// query call and is released exactly once, whatever the outcome.
pub trait TabularConnection {
    /// Run a selection over a sheet address, returning the addressed region
    /// as a table whose first row supplies the column names
    fn select(&mut self, address: &SheetAddress) -> Result<Table>;

    /// Release the connection
    fn close(&mut self) -> Result<()>;
}

/// Builds provider-specific connections for data source handles.
///
/// Injected into the executor so the provider can be substituted with a test
/// double; opening failures surface as
/// [`QueryError::DataSourceUnavailable`](crate::QueryError::DataSourceUnavailable).
pub trait ConnectionFactory {
    type Conn: TabularConnection;

    fn open(&self, source: &DataSourceHandle) -> Result<Self::Conn>;
}

/// A command object bound to an open connection.
///
/// Handed to the statement strategy by mutable reference for the duration of
/// one call; the borrow ends when the executor releases the connection, so a
/// strategy cannot retain it.
pub struct QueryCommand<'c> {
    conn: &'c mut dyn TabularConnection,
}

impl<'c> QueryCommand<'c> {
    fn new(conn: &'c mut dyn TabularConnection) -> Self {
        Self { conn }
    }

    /// Run one statement against the bound connection
    pub fn run(&mut self, statement: &Statement) -> Result<Table> {
        match statement {
            Statement::Select { address } => self.conn.select(address),
        }
    }

    /// Shorthand for running a selection over a sheet address
    pub fn select(&mut self, address: &SheetAddress) -> Result<Table> {
        self.conn.select(address)
    }
}

/// Caller-supplied logic that executes one statement and produces a table.
///
/// Implemented by closures of the matching shape, so the common case needs no
/// named type:
///
/// ```rust,ignore
/// let strategy = |command: &mut QueryCommand<'_>, input: &SheetAddress| command.select(input);
/// ```
pub trait StatementStrategy<I> {
    fn run_statement(&self, command: &mut QueryCommand<'_>, input: &I) -> Result<Table>;
}

impl<I, F> StatementStrategy<I> for F
where
    F: Fn(&mut QueryCommand<'_>, &I) -> Result<Table>,
{
    fn run_statement(&self, command: &mut QueryCommand<'_>, input: &I) -> Result<Table> {
        self(command, input)
    }
}

/// Executes statements against tabular documents with a scoped connection.
///
/// Separating how to connect (the factory) from what to run (the strategy)
/// lets callers vary the query — full sheet, ranged sheet, several sheets —
/// without duplicating connection-lifecycle handling. Failures are never
/// retried: a stateful provider makes blind retry unsafe, so a retry must go
/// back through `execute` and get a fresh connection.
pub struct QueryExecutor<F: ConnectionFactory> {
    factory: F,
}

impl<F: ConnectionFactory> QueryExecutor<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    /// Open a connection for `source`, run the strategy against it, and
    /// release the connection on every exit path.
    ///
    /// The strategy's table is returned unchanged. If both the strategy and
    /// the close fail, the strategy failure is returned and the close failure
    /// is logged as secondary information.
    pub fn execute<I, S>(&self, source: impl AsRef<Path>, strategy: &S, input: &I) -> Result<Table>
    where
        S: StatementStrategy<I>,
    {
        let handle = DataSourceHandle::new(source.as_ref());
        tracing::debug!(source = %handle, "opening tabular connection");
        let mut conn = self.factory.open(&handle)?;

        let result = {
            let mut command = QueryCommand::new(&mut conn);
            strategy.run_statement(&mut command, input)
        };

        let closed = conn.close();
        match (result, closed) {
            (Ok(table), Ok(())) => Ok(table),
            (Ok(_), Err(close_err)) => Err(close_err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                tracing::warn!(
                    source = %handle,
                    error = %close_err,
                    "connection close failed after statement error"
                );
                Err(err)
            }
        }
    }
}
