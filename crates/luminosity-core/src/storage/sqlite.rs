use crate::error::Error;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Params, Row};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A read-only connection to one of the application's SQLite files (the
/// catalog itself or a preview cache index). The connection is released when
/// the `Database` is dropped.
pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    /// Opens the file read-only and checks that it is a readable SQLite
    /// database. Fails if the file is missing, not a database, or locked by
    /// the application.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let open_error = |source| Error::Open {
            path: path.clone(),
            source,
        };

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(open_error)?;

        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(open_error)?;

        debug!(path = %path.display(), status = "ok", "Opened database");
        Ok(Database { conn, path })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs a query and maps every row, logging the label, row count and
    /// outcome.
    pub fn query<T, P, F>(&self, label: &str, sql: &str, params: P, f: F) -> Result<Vec<T>, Error>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let result = self.collect_rows(sql, params, f);

        match &result {
            Ok(rows) => debug!(label, rows = rows.len(), status = "ok", "Executed query"),
            Err(e) => debug!(label, sql, status = "error", error = %e, "Executed query"),
        }
        Ok(result?)
    }

    fn collect_rows<T, P, F>(&self, sql: &str, params: P, f: F) -> rusqlite::Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, f)?
            .collect::<rusqlite::Result<Vec<T>>>()?;
        Ok(rows)
    }

    /// Explicitly releases the connection, reporting any close error.
    pub fn close(self) -> Result<(), Error> {
        self.conn.close().map_err(|(_, e)| Error::Query(e))
    }
}

/// Reads a nullable numeric column. Lightroom stores some EXIF numbers as
/// text, so textual values are parsed as well.
pub(crate) fn get_f64_opt(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<f64>> {
    match row.get_ref(idx)? {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(i) => Ok(Some(i as f64)),
        ValueRef::Real(f) => Ok(Some(f)),
        ValueRef::Text(t) => {
            let text = String::from_utf8_lossy(t);
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed.parse::<f64>().map(Some).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
            })
        }
        ValueRef::Blob(_) => Err(rusqlite::Error::InvalidColumnType(
            idx,
            "numeric".to_string(),
            rusqlite::types::Type::Blob,
        )),
    }
}

/// Reads a nullable column as text regardless of its storage class.
pub(crate) fn get_text_opt(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    match row.get_ref(idx)? {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(i) => Ok(Some(i.to_string())),
        ValueRef::Real(f) => Ok(Some(f.to_string())),
        ValueRef::Text(t) | ValueRef::Blob(t) => Ok(Some(String::from_utf8_lossy(t).into_owned())),
    }
}
