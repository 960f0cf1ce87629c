mod helpers;
mod mocks;

mod catalog;
mod checkout;
mod dashboard;
