//! Payout methods through which a commerce receives its settlements.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::resource::{DeletionPolicy, FilterField, Resource};
use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutMethodType {
    BankTransfer,
    DigitalWallet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Savings,
    Checking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutMethod {
    pub commerce_id: Uuid,
    pub method_type: PayoutMethodType,
    pub bank_name: Option<String>,
    pub account_type: Option<AccountType>,
    pub account_number: String,
    pub holder_name: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePayoutMethodRequest {
    pub commerce_id: Uuid,
    pub method_type: PayoutMethodType,
    #[validate(length(min = 1, max = 100, message = "Bank name must be 1-100 characters"))]
    pub bank_name: Option<String>,
    pub account_type: Option<AccountType>,
    #[validate(custom(function = "shared::validation::validate_account_number"))]
    pub account_number: String,
    #[validate(length(min = 1, max = 150, message = "Holder name must be 1-150 characters"))]
    pub holder_name: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePayoutMethodRequest {
    pub method_type: Option<PayoutMethodType>,
    #[validate(length(min = 1, max = 100, message = "Bank name must be 1-100 characters"))]
    #[serde(default, deserialize_with = "shared::nullable::deserialize")]
    pub bank_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "shared::nullable::deserialize")]
    pub account_type: Option<Option<AccountType>>,
    #[validate(custom(function = "shared::validation::validate_account_number"))]
    pub account_number: Option<String>,
    #[validate(length(min = 1, max = 150, message = "Holder name must be 1-150 characters"))]
    pub holder_name: Option<String>,
    pub is_default: Option<bool>,
}

impl Resource for PayoutMethod {
    const KIND: &'static str = "PayoutMethod";
    const TABLE: &'static str = "payout_methods";
    const DELETION: DeletionPolicy = DeletionPolicy::Soft;
    const FILTERS: &'static [FilterField] = &[
        FilterField::exact("commerce_id"),
        FilterField::exact("method_type"),
        FilterField::contains("bank_name"),
    ];

    type Create = CreatePayoutMethodRequest;
    type Update = UpdatePayoutMethodRequest;

    fn create(input: Self::Create) -> Self {
        Self {
            commerce_id: input.commerce_id,
            method_type: input.method_type,
            bank_name: input.bank_name,
            account_type: input.account_type,
            account_number: input.account_number,
            holder_name: input.holder_name,
            is_default: input.is_default,
        }
    }

    fn apply(&mut self, patch: Self::Update) {
        if let Some(method_type) = patch.method_type {
            self.method_type = method_type;
        }
        if let Some(bank_name) = patch.bank_name {
            self.bank_name = bank_name;
        }
        if let Some(account_type) = patch.account_type {
            self.account_type = account_type;
        }
        if let Some(account_number) = patch.account_number {
            self.account_number = account_number;
        }
        if let Some(holder_name) = patch.holder_name {
            self.holder_name = holder_name;
        }
        if let Some(is_default) = patch.is_default {
            self.is_default = is_default;
        }
    }

    fn check(&self) -> DomainResult<()> {
        if self.method_type == PayoutMethodType::BankTransfer {
            if self.bank_name.is_none() {
                return Err(DomainError::invalid_field(
                    "bank_name",
                    "Bank transfers require a bank name",
                ));
            }
            if self.account_type.is_none() {
                return Err(DomainError::invalid_field(
                    "account_type",
                    "Bank transfers require an account type",
                ));
            }
        }
        Ok(())
    }
}
