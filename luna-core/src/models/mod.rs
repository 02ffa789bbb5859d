mod credit;
mod quote;
mod settings;

pub use credit::{ContractDuration, CreditLine};
pub use quote::{PricingMode, QuoteForm, QuoteRecord};
pub use settings::{Settings, Theme};
