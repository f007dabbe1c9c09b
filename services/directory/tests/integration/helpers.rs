use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use staffdesk_directory::domain::repository::{
    EmployeeRepository, IdentityError, IdentityProvider, UserProjectionRepository,
};
use staffdesk_directory::domain::types::{Employee, EmployeeStatus, UserProjection};
use staffdesk_directory::error::DirectoryServiceError;
use staffdesk_domain::code::EmployeeCode;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

/// Shared in-memory store backing the mock repositories, so a provisioning
/// usecase and the assertions after it see the same state.
#[derive(Default)]
pub struct TestStore {
    pub employees: Arc<Mutex<Vec<Employee>>>,
    pub users: Arc<Mutex<Vec<UserProjection>>>,
    pub identities: Arc<Mutex<Vec<FakeIdentity>>>,
}

impl TestStore {
    pub fn employee_repo(&self) -> MockEmployeeRepo {
        MockEmployeeRepo {
            employees: Arc::clone(&self.employees),
            users: Arc::clone(&self.users),
        }
    }

    pub fn user_repo(&self) -> MockUserProjectionRepo {
        MockUserProjectionRepo {
            users: Arc::clone(&self.users),
        }
    }

    pub fn identity_provider(&self) -> FakeIdentityProvider {
        FakeIdentityProvider {
            identities: Arc::clone(&self.identities),
        }
    }

    pub fn seed_employee(&self, employee: Employee) {
        self.employees.lock().unwrap().push(employee);
    }

    pub fn seed_identity(&self, email: &str, password: &str) -> Uuid {
        let uid = Uuid::now_v7();
        self.identities.lock().unwrap().push(FakeIdentity {
            uid,
            email: email.to_owned(),
            password: password.to_owned(),
        });
        uid
    }
}

pub fn test_employee(code: &str, name: &str, email: &str) -> Employee {
    Employee {
        id: Uuid::now_v7(),
        code: EmployeeCode::parse(code).unwrap(),
        email: email.to_owned(),
        name: name.to_owned(),
        phone: "9876543210".into(),
        dob: "01/01/1995".into(),
        blood_group: "O+".into(),
        department: "Engineering".into(),
        role: "Employee".into(),
        designation: "Developer".into(),
        working_project: "Dashboard".into(),
        joining_date: "01/06/2023".into(),
        location: "Pune".into(),
        work_format: "Remote".into(),
        nationality: "Indian".into(),
        position: "SDE".into(),
        status: EmployeeStatus::Active,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// ── MockEmployeeRepo ─────────────────────────────────────────────────────────

pub struct MockEmployeeRepo {
    pub employees: Arc<Mutex<Vec<Employee>>>,
    pub users: Arc<Mutex<Vec<UserProjection>>>,
}

impl MockEmployeeRepo {
    /// Emulates the partial unique indexes over active rows.
    fn active_conflict(
        employees: &[Employee],
        candidate: &Employee,
    ) -> Option<DirectoryServiceError> {
        for e in employees {
            if e.id == candidate.id || e.status != EmployeeStatus::Active {
                continue;
            }
            if e.email == candidate.email {
                return Some(DirectoryServiceError::DuplicateEmail);
            }
            if e.code == candidate.code {
                return Some(DirectoryServiceError::DuplicateCode);
            }
        }
        None
    }
}

impl EmployeeRepository for MockEmployeeRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, DirectoryServiceError> {
        Ok(self
            .employees
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn find_active_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Employee>, DirectoryServiceError> {
        Ok(self
            .employees
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.email == email && e.status == EmployeeStatus::Active)
            .cloned())
    }

    async fn find_active_by_code(
        &self,
        code: &EmployeeCode,
    ) -> Result<Option<Employee>, DirectoryServiceError> {
        Ok(self
            .employees
            .lock()
            .unwrap()
            .iter()
            .find(|e| &e.code == code && e.status == EmployeeStatus::Active)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Employee>, DirectoryServiceError> {
        let mut active: Vec<Employee> = self
            .employees
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.status == EmployeeStatus::Active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(active)
    }

    async fn list_code_numbers(&self) -> Result<Vec<u32>, DirectoryServiceError> {
        Ok(self
            .employees
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.code.number())
            .collect())
    }

    async fn create_with_projection(
        &self,
        employee: &Employee,
        user: &UserProjection,
    ) -> Result<(), DirectoryServiceError> {
        let mut employees = self.employees.lock().unwrap();
        if let Some(conflict) = Self::active_conflict(&employees, employee) {
            return Err(conflict);
        }
        employees.push(employee.clone());
        let mut users = self.users.lock().unwrap();
        users.retain(|u| u.uid != user.uid);
        users.push(user.clone());
        Ok(())
    }

    async fn update(&self, employee: &Employee) -> Result<(), DirectoryServiceError> {
        let mut employees = self.employees.lock().unwrap();
        if let Some(conflict) = Self::active_conflict(&employees, employee) {
            return Err(conflict);
        }
        let row = employees
            .iter_mut()
            .find(|e| e.id == employee.id)
            .ok_or(DirectoryServiceError::EmployeeNotFound)?;
        *row = employee.clone();
        Ok(())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: EmployeeStatus,
    ) -> Result<bool, DirectoryServiceError> {
        let mut employees = self.employees.lock().unwrap();
        match employees.iter_mut().find(|e| e.id == id) {
            Some(e) => {
                e.status = status;
                e.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_email(&self, email: &str) -> Result<u64, DirectoryServiceError> {
        let mut employees = self.employees.lock().unwrap();
        let before = employees.len();
        employees.retain(|e| e.email != email);
        Ok((before - employees.len()) as u64)
    }
}

// ── MockUserProjectionRepo ───────────────────────────────────────────────────

pub struct MockUserProjectionRepo {
    pub users: Arc<Mutex<Vec<UserProjection>>>,
}

impl UserProjectionRepository for MockUserProjectionRepo {
    async fn find_by_uid(
        &self,
        uid: Uuid,
    ) -> Result<Option<UserProjection>, DirectoryServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.uid == uid)
            .cloned())
    }

    async fn upsert(&self, user: &UserProjection) -> Result<(), DirectoryServiceError> {
        let mut users = self.users.lock().unwrap();
        users.retain(|u| u.uid != user.uid);
        users.push(user.clone());
        Ok(())
    }

    async fn delete_by_email(&self, email: &str) -> Result<u64, DirectoryServiceError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.email != email);
        Ok((before - users.len()) as u64)
    }
}

// ── FakeIdentityProvider ─────────────────────────────────────────────────────

/// Plaintext stand-in for the argon2-backed provider. Enforces the
/// one-identity-per-email invariant the real store's unique index provides.
#[derive(Debug, Clone)]
pub struct FakeIdentity {
    pub uid: Uuid,
    pub email: String,
    pub password: String,
}

pub struct FakeIdentityProvider {
    pub identities: Arc<Mutex<Vec<FakeIdentity>>>,
}

impl IdentityProvider for FakeIdentityProvider {
    async fn create(&self, email: &str, password: &str) -> Result<Uuid, IdentityError> {
        let mut identities = self.identities.lock().unwrap();
        if identities.iter().any(|i| i.email == email) {
            return Err(IdentityError::EmailAlreadyRegistered);
        }
        let uid = Uuid::now_v7();
        identities.push(FakeIdentity {
            uid,
            email: email.to_owned(),
            password: password.to_owned(),
        });
        Ok(uid)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Uuid, IdentityError> {
        let identities = self.identities.lock().unwrap();
        let identity = identities
            .iter()
            .find(|i| i.email == email)
            .ok_or(IdentityError::NotFound)?;
        if identity.password == password {
            Ok(identity.uid)
        } else {
            Err(IdentityError::WrongCredential)
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Uuid>, IdentityError> {
        Ok(self
            .identities
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.email == email)
            .map(|i| i.uid))
    }

    async fn update_credentials(
        &self,
        uid: Uuid,
        email: &str,
        password: &str,
    ) -> Result<(), IdentityError> {
        let mut identities = self.identities.lock().unwrap();
        if identities.iter().any(|i| i.email == email && i.uid != uid) {
            return Err(IdentityError::EmailAlreadyRegistered);
        }
        let identity = identities
            .iter_mut()
            .find(|i| i.uid == uid)
            .ok_or(IdentityError::NotFound)?;
        identity.email = email.to_owned();
        identity.password = password.to_owned();
        Ok(())
    }

    async fn delete(&self, uid: Uuid) -> Result<bool, IdentityError> {
        let mut identities = self.identities.lock().unwrap();
        let before = identities.len();
        identities.retain(|i| i.uid != uid);
        Ok(identities.len() < before)
    }
}
