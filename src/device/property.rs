//! Flat property enumeration, banded by interface (spec.md §3.3).
//!
//! One enum, one name, independent of which D-Bus interface actually
//! carries the value — clients subscribe to `propertyChanged` without
//! discriminating by interface (spec.md §3.3 rationale). The
//! name<->enum mapping is a single table scanned in both directions
//! (spec.md §9 design note), rather than the two hand-rolled maps the
//! original C++ kept in sync by hand.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Property {
    // --- Block, 1-29 ---
    BlockConfiguration = 1,
    BlockCryptoBackingDevice,
    BlockDevice,
    BlockDrive,
    BlockIdLabel,
    BlockIdType,
    BlockIdUsage,
    BlockIdUuid,
    BlockIdVersion,
    BlockDeviceNumber,
    BlockPreferredDevice,
    BlockSize,
    BlockReadOnly,
    BlockSymlinks,
    BlockHintPartitionable,
    BlockHintSystem,
    BlockHintIgnore,
    BlockHintAuto,
    BlockHintName,
    BlockHintIconName,
    BlockHintSymbolicIconName,
    BlockMdRaid,
    BlockMdRaidMember,

    // --- Drive, 30-59 ---
    DriveConnectionBus = 30,
    DriveRemovable,
    DriveEjectable,
    DriveSeat,
    DriveMedia,
    DriveMediaCompatibility,
    DriveMediaRemovable,
    DriveMediaAvailable,
    DriveMediaChangeDetected,
    DriveTimeDetected,
    DriveTimeMediaDetected,
    DriveSize,
    DriveOptical,
    DriveOpticalBlank,
    DriveOpticalNumTracks,
    DriveOpticalNumAudioTracks,
    DriveOpticalNumDataTracks,
    DriveOpticalNumSessions,
    DriveModel,
    DriveRevision,
    DriveRotationRate,
    DriveSerial,
    DriveVendor,
    DriveWwn,
    DriveSortKey,
    DriveConfiguration,
    DriveId,
    DriveCanPowerOff,
    DriveSiblingId,

    // --- Filesystem, 60-79 ---
    FileSystemMountPoints = 60,

    // --- Partition, 80-99 ---
    PartitionNumber = 80,
    PartitionType,
    PartitionOffset,
    PartitionSize,
    PartitionFlags,
    PartitionName,
    PartitionUuid,
    PartitionTable,
    PartitionIsContainer,
    PartitionIsContained,

    // --- Encrypted, 100-119 ---
    EncryptedChildConfiguration = 100,
    EncryptedCleartextDevice,
    EncryptedHintEncryptionType,
    EncryptedMetadataSize,

    // --- Protocol, 800+ ---
    ProtocolPlaceholder = 800,
}

impl Property {
    pub fn band(self) -> PropertyBand {
        match self as u16 {
            1..=29 => PropertyBand::Block,
            30..=59 => PropertyBand::Drive,
            60..=79 => PropertyBand::FileSystem,
            80..=99 => PropertyBand::Partition,
            100..=119 => PropertyBand::Encrypted,
            _ => PropertyBand::Protocol,
        }
    }

    pub fn name(self) -> &'static str {
        for (prop, name) in TABLE {
            if *prop == self {
                return name;
            }
        }
        unreachable!("every Property variant is listed in TABLE")
    }

    pub fn from_name(name: &str) -> Option<Self> {
        TABLE.iter().find(|(_, n)| *n == name).map(|(p, _)| *p)
    }

    /// Translate a (D-Bus interface name, property name) pair to the flat
    /// enum, dropping anything the interface doesn't recognize (spec.md
    /// §4.2 "drops unknowns").
    pub fn from_interface_and_name(interface: &str, name: &str) -> Option<Self> {
        let expected_band = match interface {
            "org.freedesktop.UDisks2.Block" => PropertyBand::Block,
            "org.freedesktop.UDisks2.Drive" => PropertyBand::Drive,
            "org.freedesktop.UDisks2.Filesystem" => PropertyBand::FileSystem,
            "org.freedesktop.UDisks2.Partition" => PropertyBand::Partition,
            "org.freedesktop.UDisks2.Encrypted" => PropertyBand::Encrypted,
            _ => return None,
        };
        Self::from_name(name).filter(|p| p.band() == expected_band)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyBand {
    Block,
    Drive,
    FileSystem,
    Partition,
    Encrypted,
    Protocol,
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

use Property::*;

const TABLE: &[(Property, &str)] = &[
    (BlockConfiguration, "Configuration"),
    (BlockCryptoBackingDevice, "CryptoBackingDevice"),
    (BlockDevice, "Device"),
    (BlockDrive, "Drive"),
    (BlockIdLabel, "IdLabel"),
    (BlockIdType, "IdType"),
    (BlockIdUsage, "IdUsage"),
    (BlockIdUuid, "IdUUID"),
    (BlockIdVersion, "IdVersion"),
    (BlockDeviceNumber, "DeviceNumber"),
    (BlockPreferredDevice, "PreferredDevice"),
    (BlockSize, "Size"),
    (BlockReadOnly, "ReadOnly"),
    (BlockSymlinks, "Symlinks"),
    (BlockHintPartitionable, "HintPartitionable"),
    (BlockHintSystem, "HintSystem"),
    (BlockHintIgnore, "HintIgnore"),
    (BlockHintAuto, "HintAuto"),
    (BlockHintName, "HintName"),
    (BlockHintIconName, "HintIconName"),
    (BlockHintSymbolicIconName, "HintSymbolicIconName"),
    (BlockMdRaid, "MDRaid"),
    (BlockMdRaidMember, "MDRaidMember"),
    (DriveConnectionBus, "ConnectionBus"),
    (DriveRemovable, "Removable"),
    (DriveEjectable, "Ejectable"),
    (DriveSeat, "Seat"),
    (DriveMedia, "Media"),
    (DriveMediaCompatibility, "MediaCompatibility"),
    (DriveMediaRemovable, "MediaRemovable"),
    (DriveMediaAvailable, "MediaAvailable"),
    (DriveMediaChangeDetected, "MediaChangeDetected"),
    (DriveTimeDetected, "TimeDetected"),
    (DriveTimeMediaDetected, "TimeMediaDetected"),
    (DriveSize, "Size"),
    (DriveOptical, "Optical"),
    (DriveOpticalBlank, "OpticalBlank"),
    (DriveOpticalNumTracks, "OpticalNumTracks"),
    (DriveOpticalNumAudioTracks, "OpticalNumAudioTracks"),
    (DriveOpticalNumDataTracks, "OpticalNumDataTracks"),
    (DriveOpticalNumSessions, "OpticalNumSessions"),
    (DriveModel, "Model"),
    (DriveRevision, "Revision"),
    (DriveRotationRate, "RotationRate"),
    (DriveSerial, "Serial"),
    (DriveVendor, "Vendor"),
    (DriveWwn, "WWN"),
    (DriveSortKey, "SortKey"),
    (DriveConfiguration, "Configuration"),
    (DriveId, "Id"),
    (DriveCanPowerOff, "CanPowerOff"),
    (DriveSiblingId, "SiblingId"),
    (FileSystemMountPoints, "MountPoints"),
    (PartitionNumber, "Number"),
    (PartitionType, "Type"),
    (PartitionOffset, "Offset"),
    (PartitionSize, "Size"),
    (PartitionFlags, "Flags"),
    (PartitionName, "Name"),
    (PartitionUuid, "UUID"),
    (PartitionTable, "Table"),
    (PartitionIsContainer, "IsContainer"),
    (PartitionIsContained, "IsContained"),
    (EncryptedChildConfiguration, "ChildConfiguration"),
    (EncryptedCleartextDevice, "CleartextDevice"),
    (EncryptedHintEncryptionType, "HintEncryptionType"),
    (EncryptedMetadataSize, "MetadataSize"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_match_spec_ranges() {
        assert_eq!(Property::BlockSize.band(), PropertyBand::Block);
        assert_eq!(Property::DriveModel.band(), PropertyBand::Drive);
        assert_eq!(Property::FileSystemMountPoints.band(), PropertyBand::FileSystem);
        assert_eq!(Property::PartitionUuid.band(), PropertyBand::Partition);
        assert_eq!(Property::EncryptedMetadataSize.band(), PropertyBand::Encrypted);
        assert_eq!(Property::ProtocolPlaceholder.band(), PropertyBand::Protocol);
    }

    #[test]
    fn every_entry_has_consistent_name() {
        for (prop, name) in TABLE {
            assert_eq!(prop.name(), *name);
        }
    }

    #[test]
    fn interface_scoped_lookup_drops_unknowns() {
        assert_eq!(
            Property::from_interface_and_name("org.freedesktop.UDisks2.Block", "Size"),
            Some(Property::BlockSize)
        );
        // "Size" exists on Drive too but interface scoping must pick the right band.
        assert_eq!(
            Property::from_interface_and_name("org.freedesktop.UDisks2.Drive", "Size"),
            Some(Property::DriveSize)
        );
        assert_eq!(
            Property::from_interface_and_name("org.freedesktop.UDisks2.Block", "NoSuchThing"),
            None
        );
        assert_eq!(
            Property::from_interface_and_name("org.freedesktop.Unknown", "Size"),
            None
        );
    }
}
