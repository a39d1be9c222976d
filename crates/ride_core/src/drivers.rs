//! Driver registry: owns every driver record and hands out driver ids.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Entity, RideError, RideResult};
use crate::model::{CarCategory, Driver, DriverId, RatingAccumulator, Vehicle};

/// Drivers in registration order plus the id counter, guarded together so
/// id assignment and insertion are one step.
#[derive(Debug)]
pub(crate) struct DriverTable {
    drivers: Vec<Driver>,
    next_id: u32,
}

impl Default for DriverTable {
    fn default() -> Self {
        Self {
            drivers: Vec::new(),
            next_id: 1,
        }
    }
}

impl DriverTable {
    pub(crate) fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    pub(crate) fn get(&self, id: DriverId) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: DriverId) -> Option<&mut Driver> {
        self.drivers.iter_mut().find(|d| d.id == id)
    }
}

#[derive(Debug, Default)]
pub struct DriverRegistry {
    table: RwLock<DriverTable>,
}

impl DriverRegistry {
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, DriverTable> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, DriverTable> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(
        &self,
        name: impl Into<String>,
        model: impl Into<String>,
        plate: impl Into<String>,
        category: CarCategory,
    ) -> Driver {
        let mut table = self.write();
        let id = DriverId(table.next_id);
        table.next_id += 1;
        let driver = Driver {
            id,
            name: name.into(),
            vehicle: Vehicle {
                model: model.into(),
                plate: plate.into(),
                category,
            },
            available: true,
            rating: RatingAccumulator::default(),
        };
        table.drivers.push(driver.clone());
        driver
    }

    /// Remove an idle driver. Busy drivers stay put until their booking ends.
    pub fn remove(&self, id: DriverId) -> RideResult<Driver> {
        let mut table = self.write();
        let index = table
            .drivers
            .iter()
            .position(|d| d.id == id)
            .ok_or(RideError::NotFound(Entity::Driver(id)))?;
        if !table.drivers[index].available {
            return Err(RideError::Conflict { driver: id });
        }
        Ok(table.drivers.remove(index))
    }

    pub fn find(&self, id: DriverId) -> Option<Driver> {
        self.read().get(id).cloned()
    }

    pub fn list(&self) -> Vec<Driver> {
        self.read().drivers.clone()
    }

    pub fn available(&self) -> Vec<Driver> {
        self.read()
            .drivers
            .iter()
            .filter(|d| d.available)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set_availability(&self, id: DriverId, available: bool) -> RideResult<()> {
        let mut table = self.write();
        let driver = table
            .get_mut(id)
            .ok_or(RideError::NotFound(Entity::Driver(id)))?;
        driver.available = available;
        Ok(())
    }

    /// Record a 1..=5 star rating and return the updated accumulator.
    pub fn add_rating(&self, id: DriverId, stars: u8) -> RideResult<RatingAccumulator> {
        if !(1..=5).contains(&stars) {
            return Err(RideError::InvalidInput(format!(
                "rating must be between 1 and 5, got {stars}"
            )));
        }
        let mut table = self.write();
        let driver = table
            .get_mut(id)
            .ok_or(RideError::NotFound(Entity::Driver(id)))?;
        driver.rating.record(stars);
        Ok(driver.rating)
    }
}
