//! Requests service - a signed-in user's own requests

use serde::Deserialize;
use uuid::Uuid;

use super::directory::Directory;
use crate::domain::result::{Error, Result};
use crate::domain::{Request, RequestItem, Session};

#[derive(Debug, Clone, Deserialize)]
pub struct RequestInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub items: Vec<RequestItem>,
}

pub struct RequestService<'a> {
    directory: &'a mut Directory,
    session: &'a Session,
}

impl<'a> RequestService<'a> {
    pub fn new(directory: &'a mut Directory, session: &'a Session) -> Self {
        Self { directory, session }
    }

    /// Requests owned by the signed-in account, oldest first
    pub fn list_mine(&self) -> Result<Vec<&Request>> {
        let user = self.session.require_login()?;
        Ok(self
            .directory
            .requests
            .iter()
            .filter(|r| r.is_owned_by(&user.email))
            .collect())
    }

    pub fn create(&mut self, input: RequestInput) -> Result<Request> {
        let user = self.session.require_login()?;
        let items = input
            .items
            .into_iter()
            .map(|item| RequestItem::new(item.name.trim(), item.qty))
            .collect();
        let request = Request::new(user.email.clone(), input.kind.trim(), items);
        request.validate()?;

        self.directory.requests.create(request)
    }

    /// Delete a request; only its owner may
    pub fn delete(&mut self, id: Uuid) -> Result<Request> {
        let user = self.session.require_login()?;
        let request = self
            .directory
            .requests
            .get(id)
            .ok_or_else(|| Error::not_found(format!("no request with id {}", id)))?;
        if !request.is_owned_by(&user.email) {
            return Err(Error::authorization("only the owner can delete a request"));
        }

        self.directory.requests.delete(id)
    }
}
