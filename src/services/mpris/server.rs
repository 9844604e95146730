use tracing::{debug, info, instrument, warn};
use zbus::{Connection, connection};

use crate::config::BusKind;

use super::{MprisDevice, MprisError, PlayerInterface, RootInterface, utils};

/// One receiver published on the bus under its own well-known name.
///
/// Each receiver gets a dedicated connection, since every MPRIS player must
/// own a distinct name while serving the same object path.
pub struct MprisServer {
    connection: Connection,
    bus_name: String,
}

impl MprisServer {
    /// Export both MPRIS interfaces for a receiver.
    ///
    /// # Errors
    /// Returns `MprisError::ExportFailed` if the bus connection cannot be
    /// opened or the name cannot be acquired
    #[instrument(skip(device))]
    pub async fn export(
        bus: BusKind,
        namespace: &str,
        device: MprisDevice,
    ) -> Result<Self, MprisError> {
        let uuid = device.identity.read().await.id.to_string();
        let bus_name = utils::bus_name(namespace, &uuid);
        let export_failed = |e: zbus::Error| MprisError::ExportFailed {
            bus_name: bus_name.clone(),
            reason: e.to_string(),
        };

        let builder = match bus {
            BusKind::Session => connection::Builder::session(),
            BusKind::System => connection::Builder::system(),
        }
        .map_err(export_failed)?;

        let connection = builder
            .name(bus_name.clone())
            .map_err(export_failed)?
            .serve_at(utils::MPRIS_OBJECT_PATH, RootInterface::new(device.clone()))
            .map_err(export_failed)?
            .serve_at(utils::MPRIS_OBJECT_PATH, PlayerInterface::new(device))
            .map_err(export_failed)?
            .build()
            .await
            .map_err(export_failed)?;

        info!(%bus_name, "Exported MPRIS player");
        Ok(Self {
            connection,
            bus_name,
        })
    }

    /// The well-known name this player owns
    pub fn bus_name(&self) -> &str {
        &self.bus_name
    }

    /// Announce a state change through `PropertiesChanged`.
    ///
    /// Position is never announced, clients poll it.
    ///
    /// # Errors
    /// Returns `MprisError::DbusError` if the signal cannot be emitted
    pub async fn notify_changed(&self) -> Result<(), MprisError> {
        let iface_ref = self
            .connection
            .object_server()
            .interface::<_, PlayerInterface>(utils::MPRIS_OBJECT_PATH)
            .await?;
        let iface = iface_ref.get().await;
        let emitter = iface_ref.signal_emitter();

        iface.playback_status_changed(emitter).await?;
        iface.metadata_changed(emitter).await?;
        iface.can_play_changed(emitter).await?;
        iface.can_pause_changed(emitter).await?;
        debug!(bus_name = %self.bus_name, "Announced property changes");
        Ok(())
    }

    /// Give up the bus name.
    ///
    /// The connection itself closes once the last handle is dropped.
    #[instrument(skip(self), fields(bus_name = %self.bus_name))]
    pub async fn release(&self) {
        match self.connection.release_name(self.bus_name.as_str()).await {
            Ok(_) => info!("Released MPRIS player"),
            Err(e) => warn!("Failed to release bus name: {e}"),
        }
    }
}
