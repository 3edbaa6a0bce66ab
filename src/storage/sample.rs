//! Built-in sample directory

use super::CompanySource;
use crate::core::Company;
use crate::error::Result;

/// Twelve sample companies used for demos, tests and first-run seeding.
pub fn sample_companies() -> Vec<Company> {
    vec![
        Company::new(1, "Innovate Inc.", "innovate.com")
            .with_industry("Technology")
            .with_category("SaaS")
            .with_country("USA")
            .with_founded(2012)
            .with_revenue(120_000_000)
            .with_employees(1500)
            .with_technologies(["React", "Node.js", "AWS", "PostgreSQL", "Stripe"])
            .with_offices(["San Francisco", "New York", "London"]),
        Company::new(2, "HealthWell", "healthwell.io")
            .with_industry("Healthcare")
            .with_category("Telehealth")
            .with_country("Canada")
            .with_founded(2015)
            .with_revenue(75_000_000)
            .with_employees(800)
            .with_technologies(["Angular", "Python", "Google Cloud", "MySQL", "Shopify"])
            .with_offices(["Toronto", "Vancouver"]),
        Company::new(3, "FinSecure", "finsecure.co")
            .with_industry("Finance")
            .with_category("Banking")
            .with_country("UK")
            .with_founded(2008)
            .with_revenue(250_000_000)
            .with_employees(3000)
            .with_technologies(["Java", ".NET", "Azure", "SQL Server", "Intercom"])
            .with_offices(["London", "Manchester", "Edinburgh"]),
        Company::new(4, "E-Shop World", "eshopworld.net")
            .with_industry("E-commerce")
            .with_category("Marketplace")
            .with_country("Ireland")
            .with_founded(2016)
            .with_revenue(55_000_000)
            .with_employees(600)
            .with_technologies(["Shopify", "React", "GraphQL", "Stripe", "Zendesk"])
            .with_offices(["Dublin", "Berlin"]),
        Company::new(5, "TravelGo", "travelgo.com")
            .with_industry("Travel")
            .with_category("Booking")
            .with_country("Australia")
            .with_founded(2014)
            .with_revenue(30_000_000)
            .with_employees(350)
            .with_technologies(["Vue.js", "PHP", "AWS", "MongoDB"])
            .with_offices(["Sydney", "Melbourne"]),
        Company::new(6, "AdOptimize", "adoptimize.ai")
            .with_industry("Advertising")
            .with_category("AdTech")
            .with_country("USA")
            .with_founded(2017)
            .with_revenue(90_000_000)
            .with_employees(1100)
            .with_technologies(["Python", "TensorFlow", "Google Cloud", "BigQuery", "React"])
            .with_offices(["Austin", "Chicago"]),
        Company::new(7, "GreenEnergy Solutions", "greenenergy.sol")
            .with_industry("Energy")
            .with_category("Renewables")
            .with_country("Germany")
            .with_founded(2010)
            .with_revenue(150_000_000)
            .with_employees(2200)
            .with_technologies(["Python", "Java", "Azure", "IoT", "SQL Server"])
            .with_offices(["Berlin", "Munich", "Hamburg"]),
        Company::new(8, "RealEstate Finder", "realestatefinder.com")
            .with_industry("Real Estate")
            .with_category("Marketplace")
            .with_country("USA")
            .with_founded(2013)
            .with_revenue(42_000_000)
            .with_employees(550)
            .with_technologies(["React", "Firebase", "Google Maps API", "Node.js"])
            .with_offices(["Miami", "Los Angeles"]),
        Company::new(9, "CyberGuard", "cyberguard.tech")
            .with_industry("Cybersecurity")
            .with_category("Security")
            .with_country("Israel")
            .with_founded(2011)
            .with_revenue(88_000_000)
            .with_employees(900)
            .with_technologies(["Python", "Go", "AWS", "Kubernetes", "Elasticsearch"])
            .with_offices(["Tel Aviv"]),
        Company::new(10, "Gamer's Hub", "gamershub.io")
            .with_industry("Gaming")
            .with_category("Entertainment")
            .with_country("Japan")
            .with_founded(2005)
            .with_revenue(300_000_000)
            .with_employees(4000)
            .with_technologies(["C++", "Unreal Engine", "Unity", "AWS", "Node.js", "Stripe"])
            .with_offices(["Tokyo", "Kyoto", "Seattle"]),
        Company::new(11, "UK Travel Co", "uktravel.co.uk")
            .with_industry("Travel")
            .with_category("Booking")
            .with_country("UK")
            .with_founded(2009)
            .with_revenue(22_000_000)
            .with_employees(250)
            .with_technologies(["Wordpress", "PHP", "MySQL", "jQuery"])
            .with_offices(["London"]),
        Company::new(12, "Aussie Adverts", "aussieads.com.au")
            .with_industry("Advertising")
            .with_category("AdTech")
            .with_country("Australia")
            .with_founded(2018)
            .with_revenue(15_000_000)
            .with_employees(150)
            .with_technologies(["Google Analytics", "Facebook Ads", "Wordpress"])
            .with_offices(["Perth"]),
    ]
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSource;

impl CompanySource for BuiltinSource {
    fn fetch_all(&self) -> Result<Vec<Company>> {
        Ok(sample_companies())
    }

    fn describe(&self) -> String {
        "builtin sample (12 companies)".to_string()
    }
}
