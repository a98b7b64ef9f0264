//! 엔티티별 테이블 매핑.

use portflux_core::{
    Broker, CryptoCurrency, Currency, Dividend, Holding, Portfolio, Stock, Transaction, User,
};

use super::{PgEntity, SqlValue};

impl PgEntity for User {
    const TABLE: &'static str = "users";

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", SqlValue::Uuid(self.id)),
            ("firstname", SqlValue::Text(self.firstname.clone())),
            ("lastname", SqlValue::Text(self.lastname.clone())),
            ("email", SqlValue::Text(self.email.clone())),
            ("password_hash", SqlValue::Text(self.password_hash.clone())),
            ("role", SqlValue::Text(self.role.as_str().to_string())),
            ("created_at", SqlValue::Timestamp(self.created_at)),
            ("updated_at", SqlValue::Timestamp(self.updated_at)),
        ]
    }
}

impl PgEntity for Broker {
    const TABLE: &'static str = "brokers";

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", SqlValue::Uuid(self.id)),
            ("extid", SqlValue::Text(self.extid.clone())),
            ("name", SqlValue::Text(self.name.clone())),
            ("description", SqlValue::Text(self.description.clone())),
            ("slug", SqlValue::Text(self.slug.clone())),
            ("created_at", SqlValue::Timestamp(self.created_at)),
            ("updated_at", SqlValue::Timestamp(self.updated_at)),
        ]
    }
}

impl PgEntity for Portfolio {
    const TABLE: &'static str = "portfolios";

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", SqlValue::Uuid(self.id)),
            ("user_id", SqlValue::Uuid(self.user_id)),
            ("name", SqlValue::Text(self.name.clone())),
            ("extid", SqlValue::Text(self.extid.clone())),
            ("tax_country_id", SqlValue::Text(self.tax_country_id.clone())),
            ("financial_year", SqlValue::Date(self.financial_year)),
            ("performance_calculation", SqlValue::Int(self.performance_calculation)),
            ("summary", SqlValue::Bool(self.summary)),
            ("price_alert", SqlValue::Bool(self.price_alert)),
            ("company_event_alert", SqlValue::Bool(self.company_event_alert)),
            ("created_at", SqlValue::Timestamp(self.created_at)),
            ("updated_at", SqlValue::Timestamp(self.updated_at)),
        ]
    }
}

impl PgEntity for Holding {
    const TABLE: &'static str = "holdings";

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", SqlValue::Uuid(self.id)),
            ("portfolio_id", SqlValue::Uuid(self.portfolio_id)),
            ("broker_id", SqlValue::Uuid(self.broker_id)),
            ("extid", SqlValue::Text(self.extid.clone())),
            ("name", SqlValue::Text(self.name.clone())),
            ("description", SqlValue::Text(self.description.clone())),
            ("slug", SqlValue::Text(self.slug.clone())),
            ("trade_date", SqlValue::Timestamp(self.trade_date)),
            ("trade_type", SqlValue::Text(self.trade_type.clone())),
            ("quantity", SqlValue::Decimal(self.quantity)),
            ("share_price", SqlValue::Decimal(self.share_price)),
            ("exchange_rate", SqlValue::Decimal(self.exchange_rate)),
            ("exchange_currency_id", SqlValue::Uuid(self.exchange_currency_id)),
            ("brokerage_unit_price", SqlValue::Decimal(self.brokerage_unit_price)),
            ("brokerage_currency", SqlValue::Text(self.brokerage_currency.clone())),
            ("created_at", SqlValue::Timestamp(self.created_at)),
            ("updated_at", SqlValue::Timestamp(self.updated_at)),
        ]
    }
}

impl PgEntity for Stock {
    const TABLE: &'static str = "stocks";

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", SqlValue::Uuid(self.id)),
            ("holding_id", SqlValue::Uuid(self.holding_id)),
            ("extid", SqlValue::Text(self.extid.clone())),
            ("ticker_symbol", SqlValue::Text(self.ticker_symbol.clone())),
            ("company_name", SqlValue::Text(self.company_name.clone())),
            ("slug", SqlValue::Text(self.slug.clone())),
            ("created_at", SqlValue::Timestamp(self.created_at)),
            ("updated_at", SqlValue::Timestamp(self.updated_at)),
        ]
    }
}

impl PgEntity for Currency {
    const TABLE: &'static str = "currencies";

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", SqlValue::Uuid(self.id)),
            ("code", SqlValue::Text(self.code.clone())),
            ("name", SqlValue::Text(self.name.clone())),
            ("symbol", SqlValue::Text(self.symbol.clone())),
            ("created_at", SqlValue::Timestamp(self.created_at)),
            ("updated_at", SqlValue::Timestamp(self.updated_at)),
        ]
    }
}

impl PgEntity for CryptoCurrency {
    const TABLE: &'static str = "cryptocurrencies";

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", SqlValue::Uuid(self.id)),
            ("holding_id", SqlValue::OptUuid(self.holding_id)),
            ("symbol", SqlValue::Text(self.symbol.clone())),
            ("name", SqlValue::Text(self.name.clone())),
            ("created_at", SqlValue::Timestamp(self.created_at)),
            ("updated_at", SqlValue::Timestamp(self.updated_at)),
        ]
    }
}

impl PgEntity for Dividend {
    const TABLE: &'static str = "dividends";

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", SqlValue::Uuid(self.id)),
            ("stock_id", SqlValue::Uuid(self.stock_id)),
            ("dividend_per_share", SqlValue::Decimal(self.dividend_per_share)),
            ("dividend_date", SqlValue::Timestamp(self.dividend_date)),
            ("created_at", SqlValue::Timestamp(self.created_at)),
            ("updated_at", SqlValue::Timestamp(self.updated_at)),
        ]
    }
}

impl PgEntity for Transaction {
    const TABLE: &'static str = "transactions";

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", SqlValue::Uuid(self.id)),
            ("stock_id", SqlValue::OptUuid(self.stock_id)),
            ("cryptocurrency_id", SqlValue::OptUuid(self.cryptocurrency_id)),
            ("quantity", SqlValue::Decimal(self.quantity)),
            ("transaction_price", SqlValue::Decimal(self.transaction_price)),
            ("transaction_date", SqlValue::Timestamp(self.transaction_date)),
            ("created_at", SqlValue::Timestamp(self.created_at)),
            ("updated_at", SqlValue::Timestamp(self.updated_at)),
        ]
    }
}
