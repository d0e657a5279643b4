use super::{Store, StoreError};
use crate::models::{NewProject, NewTodo, Project, Todo, TodoFields};
use crate::schema::{projects, todos};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};

type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Postgres store backed by an r2d2 pool. Each call checks out one
/// connection and returns it to the pool when the call ends.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn connect(database_url: &str, pool_size: u32) -> Result<PgStore, StoreError> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder().max_size(pool_size).build(manager)?;
        Ok(PgStore { pool })
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, StoreError> {
        Ok(self.pool.get()?)
    }
}

impl Store for PgStore {
    fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let conn = self.conn()?;
        let conn: &PgConnection = &conn;
        Ok(projects::table.order(projects::id).load(conn)?)
    }

    fn create_project(&self, name: &str) -> Result<Project, StoreError> {
        let conn = self.conn()?;
        let conn: &PgConnection = &conn;
        let project = diesel::insert_into(projects::table)
            .values(&NewProject { name })
            .get_result(conn)?;
        Ok(project)
    }

    fn count_projects(&self, id: i32) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        let conn: &PgConnection = &conn;
        let count = projects::table
            .filter(projects::id.eq(id))
            .count()
            .get_result(conn)?;
        Ok(count)
    }

    fn rename_project(&self, id: i32, name: &str) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let conn: &PgConnection = &conn;
        diesel::update(projects::table.filter(projects::id.eq(id)))
            .set(projects::name.eq(name))
            .execute(conn)?;
        Ok(())
    }

    fn delete_project(&self, id: i32) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let conn: &PgConnection = &conn;
        conn.transaction::<_, diesel::result::Error, _>(|| {
            let removed =
                diesel::delete(todos::table.filter(todos::projectid.eq(id))).execute(conn)?;
            debug!("removed {} todos of project {}", removed, id);
            diesel::delete(projects::table.filter(projects::id.eq(id))).execute(conn)?;
            Ok(())
        })?;
        Ok(())
    }

    fn list_todos(&self, project_id: i32) -> Result<Vec<Todo>, StoreError> {
        let conn = self.conn()?;
        let conn: &PgConnection = &conn;
        let rows = todos::table
            .filter(todos::projectid.eq(project_id))
            .order(todos::id)
            .load(conn)?;
        Ok(rows)
    }

    fn create_todo(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let conn = self.conn()?;
        let conn: &PgConnection = &conn;
        let row = diesel::insert_into(todos::table)
            .values(&todo)
            .get_result(conn)?;
        Ok(row)
    }

    fn count_todos(&self, project_id: i32, todo_id: i32) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        let conn: &PgConnection = &conn;
        let count = todos::table
            .filter(todos::projectid.eq(project_id))
            .filter(todos::id.eq(todo_id))
            .count()
            .get_result(conn)?;
        Ok(count)
    }

    fn update_todo(
        &self,
        project_id: i32,
        todo_id: i32,
        fields: TodoFields,
        updated: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let conn: &PgConnection = &conn;
        let target = todos::table
            .filter(todos::projectid.eq(project_id))
            .filter(todos::id.eq(todo_id));
        diesel::update(target)
            .set((
                todos::title.eq(fields.title),
                todos::description.eq(fields.description),
                todos::duedate.eq(fields.duedate),
                todos::updateddate.eq(updated),
            ))
            .execute(conn)?;
        Ok(())
    }

    fn set_complete(
        &self,
        project_id: i32,
        todo_id: i32,
        complete: bool,
    ) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let conn: &PgConnection = &conn;
        let target = todos::table
            .filter(todos::projectid.eq(project_id))
            .filter(todos::id.eq(todo_id));
        diesel::update(target)
            .set(todos::complete.eq(complete))
            .execute(conn)?;
        Ok(())
    }

    fn delete_todo(&self, project_id: i32, todo_id: i32) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let conn: &PgConnection = &conn;
        let target = todos::table
            .filter(todos::projectid.eq(project_id))
            .filter(todos::id.eq(todo_id));
        diesel::delete(target).execute(conn)?;
        Ok(())
    }
}
