#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};
use wsis_domain::{
    application::ports::{TenantManager, UserStoreManager},
    domain::{
        entities::{NewTenant, RoleListUpdate},
        errors::{ServiceError, ServiceResult},
    },
};

pub const MOCK_TENANT_ID: i32 = -1234;

/// The fault every mock returns while failure mode is on
pub fn mock_fault() -> ServiceError {
    ServiceError::Fault {
        code: "soapenv:Server".to_string(),
        message: "Mock failure enabled".to_string(),
        detail: Some("mock-identity-server".to_string()),
    }
}

#[derive(Debug, Clone)]
pub struct MockUser {
    pub password: String,
    pub full_name: String,
}

/// In-memory user store standing in for RemoteUserStoreManagerService
pub struct MockUserStoreManager {
    pub users: Arc<Mutex<BTreeMap<String, MockUser>>>,
    pub roles: Arc<Mutex<BTreeMap<String, BTreeSet<String>>>>, // role -> members
    pub calls: Arc<Mutex<Vec<String>>>,
    pub should_fail: Arc<Mutex<bool>>,
}

impl MockUserStoreManager {
    pub fn new() -> Self {
        let mut roles = BTreeMap::new();
        roles.insert("admin".to_string(), BTreeSet::from(["admin".to_string()]));
        roles.insert("Internal/everyone".to_string(), BTreeSet::new());

        let mut users = BTreeMap::new();
        users.insert(
            "admin".to_string(),
            MockUser {
                password: "admin".to_string(),
                full_name: "Administrator".to_string(),
            },
        );

        Self {
            users: Arc::new(Mutex::new(users)),
            roles: Arc::new(Mutex::new(roles)),
            calls: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    /// Remote operations invoked so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &str) -> ServiceResult<()> {
        self.calls.lock().unwrap().push(operation.to_string());
        if *self.should_fail.lock().unwrap() {
            Err(mock_fault())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserStoreManager for MockUserStoreManager {
    async fn add_user(&self, username: &str, password: &str, full_name: &str) -> ServiceResult<()> {
        self.record("addUser")?;
        let mut users = self.users.lock().unwrap();
        if users.contains_key(username) {
            return Err(ServiceError::fault(
                "soapenv:Server",
                "UserAlreadyExisting:Username already exists in the system.",
            ));
        }
        users.insert(
            username.to_string(),
            MockUser {
                password: password.to_string(),
                full_name: full_name.to_string(),
            },
        );
        Ok(())
    }

    async fn delete_user(&self, username: &str) -> ServiceResult<()> {
        self.record("deleteUser")?;
        self.users.lock().unwrap().remove(username);
        for members in self.roles.lock().unwrap().values_mut() {
            members.remove(username);
        }
        Ok(())
    }

    async fn authenticate(&self, username: &str, password: &str) -> ServiceResult<bool> {
        self.record("authenticate")?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(username)
            .map(|user| user.password == password)
            .unwrap_or(false))
    }

    async fn is_existing_user(&self, username: &str) -> ServiceResult<bool> {
        self.record("isExistingUser")?;
        Ok(self.users.lock().unwrap().contains_key(username))
    }

    async fn list_users(&self) -> ServiceResult<Vec<String>> {
        self.record("listUsers")?;
        Ok(self.users.lock().unwrap().keys().cloned().collect())
    }

    async fn is_existing_role(&self, role_name: &str) -> ServiceResult<bool> {
        self.record("isExistingRole")?;
        Ok(self.roles.lock().unwrap().contains_key(role_name))
    }

    async fn add_role(&self, role_name: &str) -> ServiceResult<()> {
        self.record("addRole")?;
        self.roles
            .lock()
            .unwrap()
            .entry(role_name.to_string())
            .or_default();
        Ok(())
    }

    async fn delete_role(&self, role_name: &str) -> ServiceResult<()> {
        self.record("deleteRole")?;
        self.roles.lock().unwrap().remove(role_name);
        Ok(())
    }

    async fn get_role_names(&self) -> ServiceResult<Vec<String>> {
        self.record("getRoleNames")?;
        Ok(self.roles.lock().unwrap().keys().cloned().collect())
    }

    async fn get_role_list_of_user(&self, username: &str) -> ServiceResult<Vec<String>> {
        self.record("getRoleListOfUser")?;
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, members)| members.contains(username))
            .map(|(role, _)| role.clone())
            .collect())
    }

    async fn get_user_list_of_role(&self, role_name: &str) -> ServiceResult<Vec<String>> {
        self.record("getUserListOfRole")?;
        Ok(self
            .roles
            .lock()
            .unwrap()
            .get(role_name)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn update_role_list_of_user(
        &self,
        username: &str,
        update: &RoleListUpdate,
    ) -> ServiceResult<()> {
        self.record("updateRoleListOfUser")?;
        let mut roles = self.roles.lock().unwrap();
        for role in &update.deleted_roles {
            if let Some(members) = roles.get_mut(role) {
                members.remove(username);
            }
        }
        for role in &update.new_roles {
            roles
                .entry(role.clone())
                .or_default()
                .insert(username.to_string());
        }
        Ok(())
    }

    async fn get_tenant_id(&self) -> ServiceResult<i32> {
        self.record("getTenantId")?;
        Ok(MOCK_TENANT_ID)
    }
}

/// Tenant manager mock; records every tenant it is asked to create
pub struct MockTenantManager {
    pub tenants: Arc<Mutex<Vec<NewTenant>>>,
    pub should_fail: Arc<Mutex<bool>>,
}

impl MockTenantManager {
    pub fn new() -> Self {
        Self {
            tenants: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    pub fn tenants(&self) -> Vec<NewTenant> {
        self.tenants.lock().unwrap().clone()
    }
}

#[async_trait]
impl TenantManager for MockTenantManager {
    async fn add_tenant(&self, tenant: &NewTenant) -> ServiceResult<()> {
        self.tenants.lock().unwrap().push(tenant.clone());
        if *self.should_fail.lock().unwrap() {
            return Err(mock_fault());
        }
        Ok(())
    }
}

/// User store that answers every read with the same canned values, or fails
/// every call with `fault` when set
pub struct CannedUserStoreManager {
    pub names: Vec<String>,
    pub flag: bool,
    pub tenant_id: i32,
    pub fault: Option<ServiceError>,
}

impl CannedUserStoreManager {
    pub fn answering(names: Vec<String>, flag: bool, tenant_id: i32) -> Self {
        Self {
            names,
            flag,
            tenant_id,
            fault: None,
        }
    }

    pub fn failing(fault: ServiceError) -> Self {
        Self {
            names: Vec::new(),
            flag: false,
            tenant_id: 0,
            fault: Some(fault),
        }
    }

    fn answer<T>(&self, value: T) -> ServiceResult<T> {
        match &self.fault {
            Some(fault) => Err(fault.clone()),
            None => Ok(value),
        }
    }
}

#[async_trait]
impl UserStoreManager for CannedUserStoreManager {
    async fn add_user(&self, _: &str, _: &str, _: &str) -> ServiceResult<()> {
        self.answer(())
    }

    async fn delete_user(&self, _: &str) -> ServiceResult<()> {
        self.answer(())
    }

    async fn authenticate(&self, _: &str, _: &str) -> ServiceResult<bool> {
        self.answer(self.flag)
    }

    async fn is_existing_user(&self, _: &str) -> ServiceResult<bool> {
        self.answer(self.flag)
    }

    async fn list_users(&self) -> ServiceResult<Vec<String>> {
        self.answer(self.names.clone())
    }

    async fn is_existing_role(&self, _: &str) -> ServiceResult<bool> {
        self.answer(self.flag)
    }

    async fn add_role(&self, _: &str) -> ServiceResult<()> {
        self.answer(())
    }

    async fn delete_role(&self, _: &str) -> ServiceResult<()> {
        self.answer(())
    }

    async fn get_role_names(&self) -> ServiceResult<Vec<String>> {
        self.answer(self.names.clone())
    }

    async fn get_role_list_of_user(&self, _: &str) -> ServiceResult<Vec<String>> {
        self.answer(self.names.clone())
    }

    async fn get_user_list_of_role(&self, _: &str) -> ServiceResult<Vec<String>> {
        self.answer(self.names.clone())
    }

    async fn update_role_list_of_user(&self, _: &str, _: &RoleListUpdate) -> ServiceResult<()> {
        self.answer(())
    }

    async fn get_tenant_id(&self) -> ServiceResult<i32> {
        self.answer(self.tenant_id)
    }
}
